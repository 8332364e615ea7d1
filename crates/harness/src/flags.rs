// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flag parsing against a command's declared flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resolve::ResolutionError;
use crate::tree::{CommandNode, FlagKind};

/// Parsed flag value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    String(String),
}

/// Flags and positionals parsed for one invocation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArgs {
    /// Flag values keyed by canonical flag name
    pub flags: BTreeMap<String, FlagValue>,
    pub positionals: Vec<String>,
}

impl ParsedArgs {
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Whether a boolean flag is set to true
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(FlagValue::Bool(true)))
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.flags.get(name) {
            Some(FlagValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Parse `tokens` against the flags declared on `node`.
///
/// Boolean flags take no value (`--verbose`, `--verbose=false`). String flags
/// take the next token or the `--name=value` form. Aliases are accepted with
/// either dash prefix. `--` ends flag parsing.
pub fn parse_flags(node: &CommandNode, tokens: &[String]) -> Result<ParsedArgs, ResolutionError> {
    let mut args = ParsedArgs::default();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        if token == "--" {
            args.positionals.extend(iter.cloned());
            break;
        }

        let Some((spelling, inline)) = split_flag(token) else {
            args.positionals.push(token.clone());
            continue;
        };

        let spec = node
            .flags
            .iter()
            .find(|f| f.answers_to(spelling))
            .ok_or_else(|| ResolutionError::UnknownFlag {
                flag: token.clone(),
                command: node.name.clone(),
            })?;

        let value = match spec.kind {
            FlagKind::Boolean => match inline {
                None | Some("true") => FlagValue::Bool(true),
                Some("false") => FlagValue::Bool(false),
                Some(other) => {
                    return Err(ResolutionError::InvalidBoolean {
                        flag: spec.name.clone(),
                        value: other.to_string(),
                    })
                }
            },
            FlagKind::String => match inline {
                Some(value) => FlagValue::String(value.to_string()),
                None => match iter.next_if(|next| split_flag(next).is_none()) {
                    Some(value) => FlagValue::String(value.clone()),
                    None => {
                        return Err(ResolutionError::MissingFlagValue {
                            flag: spec.name.clone(),
                        })
                    }
                },
            },
        };
        args.flags.insert(spec.name.clone(), value);
    }

    Ok(args)
}

/// Split a flag token into its spelling and optional inline value.
///
/// Returns `None` for positionals, including `-` and negative numbers.
fn split_flag(token: &str) -> Option<(&str, Option<&str>)> {
    let body = match token.strip_prefix("--") {
        Some(long) => long,
        None => token.strip_prefix('-')?,
    };
    if body.is_empty() || body.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    })
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
