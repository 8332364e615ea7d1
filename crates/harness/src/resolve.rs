// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command path resolution.

use thiserror::Error;
use tracing::trace;

use crate::effects::Handler;
use crate::flags::{parse_flags, ParsedArgs};
use crate::tree::{CommandNode, CommandTree};

/// Errors raised while resolving a command path or its flags
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unknown command '{segment}' in '{parent}'")]
    UnknownCommand { segment: String, parent: String },

    #[error("'{path}' is a command group, not a command")]
    NoHandler { path: String },

    #[error("Unknown flag '{flag}' for '{command}'")]
    UnknownFlag { flag: String, command: String },

    #[error("Flag '{flag}' expects a value")]
    MissingFlagValue { flag: String },

    #[error("Flag '{flag}' is boolean, got '{value}'")]
    InvalidBoolean { flag: String, value: String },
}

/// A command path resolved to a runnable node
#[derive(Debug)]
pub struct Resolution<'a> {
    pub node: &'a CommandNode,
    /// Segments consumed while walking the tree, excluding the binary name
    pub command: Vec<String>,
    /// Tokens left over once the handler was reached
    pub rest: Vec<String>,
}

impl Resolution<'_> {
    pub fn handler(&self) -> Option<&Handler> {
        self.node.handler.as_ref()
    }

    /// Space-separated command path
    pub fn command_path(&self) -> String {
        self.command.join(" ")
    }

    /// Parse the leftover tokens against the node's declared flags
    pub fn parse_flags(&self) -> Result<ParsedArgs, ResolutionError> {
        parse_flags(self.node, &self.rest)
    }
}

/// Walk `tree` along `path` until a runnable node is reached.
///
/// `path` is split on whitespace; tokens consumed as command segments may also
/// be dotted (`render.docs`). A leading token naming the root (the binary) is
/// skipped.
pub fn resolve<'a>(tree: &'a CommandTree, path: &str) -> Result<Resolution<'a>, ResolutionError> {
    let root = tree.root();
    let mut tokens = path.split_whitespace().peekable();

    if tokens
        .peek()
        .is_some_and(|first| *first == root.name && root.get_child(first).is_none())
    {
        tokens.next();
    }

    let mut node = root;
    let mut command: Vec<String> = Vec::new();
    let mut rest: Vec<String> = Vec::new();

    while let Some(token) = tokens.next() {
        if node.is_runnable() || token.starts_with('-') {
            rest.push(token.to_string());
            rest.extend(tokens.by_ref().map(str::to_string));
            break;
        }

        let segments: Vec<&str> = token.split('.').filter(|s| !s.is_empty()).collect();
        for (i, segment) in segments.iter().enumerate() {
            if node.is_runnable() {
                rest.push(segments[i..].join("."));
                break;
            }
            match node.get_child(segment) {
                Some(child) => {
                    node = child;
                    command.push(segment.to_string());
                }
                None => {
                    let parent = if command.is_empty() {
                        root.name.clone()
                    } else {
                        command.join(" ")
                    };
                    return Err(ResolutionError::UnknownCommand {
                        segment: segment.to_string(),
                        parent,
                    });
                }
            }
        }
    }

    if !node.is_runnable() {
        let path = if command.is_empty() {
            root.name.clone()
        } else {
            command.join(" ")
        };
        return Err(ResolutionError::NoHandler { path });
    }

    trace!(command = %command.join(" "), rest = ?rest, "resolved command");
    Ok(Resolution {
        node,
        command,
        rest,
    })
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
