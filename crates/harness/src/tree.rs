// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static command tree description.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effects::Handler;

/// Errors raised when a command tree breaks its invariants
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Command '{path}' has both a handler and subcommands")]
    HandlerWithChildren { path: String },

    #[error("Command '{path}' declares flag '{flag}' more than once")]
    DuplicateFlag { path: String, flag: String },

    #[error("Flag '{flag}' of command '{path}' has no aliases")]
    EmptyAliases { path: String, flag: String },

    #[error("Command '{path}' stores child '{key}' under a different name '{name}'")]
    MisnamedChild {
        path: String,
        key: String,
        name: String,
    },
}

/// Type of value a flag takes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Boolean,
    String,
}

/// A flag declared on a command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagSpec {
    pub name: String,
    pub kind: FlagKind,
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FlagSpec {
    pub fn new(name: impl Into<String>, kind: FlagKind, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            description: String::new(),
        }
    }

    pub fn boolean(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self::new(name, FlagKind::Boolean, aliases)
    }

    pub fn string(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self::new(name, FlagKind::String, aliases)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Every spelling this flag answers to: its name, then its aliases
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn answers_to(&self, spelling: &str) -> bool {
        self.spellings().any(|s| s == spelling)
    }
}

/// A node in a command tree: either a group of subcommands or a runnable command
#[derive(Clone, Debug, Default)]
pub struct CommandNode {
    pub name: String,
    pub description: String,
    pub children: Option<BTreeMap<String, CommandNode>>,
    pub handler: Option<Handler>,
    pub flags: Vec<FlagSpec>,
}

impl CommandNode {
    /// A group node holding subcommands
    pub fn group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children: Some(BTreeMap::new()),
            ..Default::default()
        }
    }

    /// A runnable command node
    pub fn command(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Handler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Some(handler),
            ..Default::default()
        }
    }

    /// Add a subcommand, keyed by its name
    pub fn child(mut self, node: CommandNode) -> Self {
        self.children
            .get_or_insert_with(BTreeMap::new)
            .insert(node.name.clone(), node);
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn get_child(&self, name: &str) -> Option<&CommandNode> {
        self.children.as_ref().and_then(|c| c.get(name))
    }

    pub fn is_runnable(&self) -> bool {
        self.handler.is_some()
    }

    fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Serializable description of this node and its descendants
    pub fn describe(&self) -> TreeDescription {
        TreeDescription {
            name: self.name.clone(),
            description: self.description.clone(),
            runnable: self.is_runnable(),
            flags: self.flags.clone(),
            children: self
                .children
                .iter()
                .flatten()
                .map(|(name, child)| (name.clone(), child.describe()))
                .collect(),
        }
    }

    fn validate(&self, path: &str) -> Result<(), TreeError> {
        if self.is_runnable() && self.has_children() {
            return Err(TreeError::HandlerWithChildren {
                path: path.to_string(),
            });
        }

        let mut seen: Vec<&str> = Vec::new();
        for flag in &self.flags {
            if flag.aliases.is_empty() {
                return Err(TreeError::EmptyAliases {
                    path: path.to_string(),
                    flag: flag.name.clone(),
                });
            }
            // A flag may repeat its own name among its aliases.
            let mut own: Vec<&str> = flag.spellings().collect();
            own.sort_unstable();
            own.dedup();
            for spelling in own {
                if seen.contains(&spelling) {
                    return Err(TreeError::DuplicateFlag {
                        path: path.to_string(),
                        flag: spelling.to_string(),
                    });
                }
                seen.push(spelling);
            }
        }

        for (key, child) in self.children.iter().flatten() {
            let child_path = format!("{} {}", path, key);
            if *key != child.name {
                return Err(TreeError::MisnamedChild {
                    path: child_path,
                    key: key.clone(),
                    name: child.name.clone(),
                });
            }
            child.validate(&child_path)?;
        }
        Ok(())
    }
}

/// Serializable shape of a command tree, without handlers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDescription {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub runnable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, TreeDescription>,
}

/// A validated, read-only command tree
#[derive(Clone, Debug)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    /// Validate and wrap a root node
    pub fn new(root: CommandNode) -> Result<Self, TreeError> {
        root.validate(&root.name)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    pub fn describe(&self) -> TreeDescription {
        self.root.describe()
    }

    /// Every runnable command with its full space-separated path, sorted by path
    pub fn leaves(&self) -> Vec<(String, &CommandNode)> {
        let mut leaves = Vec::new();
        collect_leaves(&self.root, self.root.name.clone(), &mut leaves);
        leaves.sort_by(|(a, _), (b, _)| a.cmp(b));
        leaves
    }
}

fn collect_leaves<'a>(node: &'a CommandNode, path: String, out: &mut Vec<(String, &'a CommandNode)>) {
    if node.is_runnable() {
        out.push((path, node));
        return;
    }
    for (name, child) in node.children.iter().flatten() {
        collect_leaves(child, format!("{} {}", path, name), out);
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
