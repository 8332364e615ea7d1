// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interaction tables built from pattern modules.
//!
//! A pattern module pairs named pattern declarations with named replies. Every
//! declaration needs a reply of the same name and every reply a declaration.
//! Modules can be built in code or loaded from TOML or JSON files:
//!
//! ```toml
//! [patterns]
//! confirm = { kind = "confirm" }
//! name = { kind = "input", message = { "$any" = true } }
//!
//! [responses]
//! confirm = true
//! name = { "$fail" = "bad input" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::matcher::{Matcher, Reply};
use crate::pattern::Pattern;
use rigging_capture::{Fail, Response};

/// Key marking a failure reply in table files
pub const FAIL_KEY: &str = "$fail";

/// A structural problem in a pattern module
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternShapeError {
    #[error("Pattern module {module} must have a patterns table")]
    MissingDeclarations { module: String },

    #[error("Pattern module {module} pattern `{name}` must have a corresponding response by the same name")]
    DeclarationWithoutAction { module: String, name: String },

    #[error("Pattern module {module} response `{name}` must have a corresponding pattern of the same name")]
    ActionWithoutDeclaration { module: String, name: String },

    #[error("Pattern module {module} pattern `{name}` must not be null")]
    NullPattern { module: String, name: String },

    #[error("Pattern module {module} response `{name}` has an invalid `$fail` value")]
    InvalidFail { module: String, name: String },
}

/// Errors raised while building an interaction table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read pattern module: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", join_messages(.0))]
    Shape(Vec<PatternShapeError>),
}

fn join_messages(errors: &[PatternShapeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Named pattern declarations and their replies
#[derive(Clone, Debug)]
pub struct PatternModule {
    pub source: String,
    pub declarations: Option<BTreeMap<String, Value>>,
    pub actions: BTreeMap<String, Reply>,
}

impl PatternModule {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            declarations: Some(BTreeMap::new()),
            actions: BTreeMap::new(),
        }
    }

    pub fn declare(mut self, name: impl Into<String>, pattern: Value) -> Self {
        self.declarations
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), pattern);
        self
    }

    pub fn action(mut self, name: impl Into<String>, reply: impl Into<Reply>) -> Self {
        self.actions.insert(name.into(), reply.into());
        self
    }

    /// Parse a module from file contents; JSON when `path` ends in `.json`,
    /// TOML otherwise.
    pub fn parse(path: &Path, content: &str) -> Result<Self, TableError> {
        let file: TableFile = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        let source = path.display().to_string();

        let mut errors = Vec::new();
        let mut actions = BTreeMap::new();
        for (name, value) in file.responses {
            match parse_reply(value) {
                Some(reply) => {
                    actions.insert(name, reply);
                }
                None => errors.push(PatternShapeError::InvalidFail {
                    module: source.clone(),
                    name,
                }),
            }
        }
        if !errors.is_empty() {
            return Err(TableError::Shape(errors));
        }

        Ok(Self {
            source,
            declarations: file.patterns,
            actions,
        })
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Shape errors of this module, in name order
    pub fn shape_errors(&self) -> Vec<PatternShapeError> {
        let module = &self.source;
        let Some(declarations) = &self.declarations else {
            return vec![PatternShapeError::MissingDeclarations {
                module: module.clone(),
            }];
        };

        let mut errors = Vec::new();
        for name in self.actions.keys() {
            if !declarations.contains_key(name) {
                errors.push(PatternShapeError::ActionWithoutDeclaration {
                    module: module.clone(),
                    name: name.clone(),
                });
            }
        }
        for (name, pattern) in declarations {
            if pattern.is_null() {
                errors.push(PatternShapeError::NullPattern {
                    module: module.clone(),
                    name: name.clone(),
                });
            } else if !self.actions.contains_key(name) {
                errors.push(PatternShapeError::DeclarationWithoutAction {
                    module: module.clone(),
                    name: name.clone(),
                });
            }
        }
        errors
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    patterns: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    responses: BTreeMap<String, Value>,
}

/// A `{ "$fail": ... }` object becomes a failure; anything else a value.
fn parse_reply(value: Value) -> Option<Reply> {
    let fail = match &value {
        Value::Object(map) if map.len() == 1 => map.get(FAIL_KEY),
        _ => None,
    };
    let Some(fail) = fail else {
        return Some(Reply::Respond(Response::Value(value)));
    };
    match fail {
        Value::String(message) => Some(Reply::from(Fail::new(message.clone()))),
        Value::Object(_) => serde_json::from_value::<Fail>(fail.clone())
            .ok()
            .map(Reply::from),
        _ => None,
    }
}

/// One named pattern of an interaction table
#[derive(Clone, Debug)]
pub struct TableEntry {
    pub module: String,
    pub name: String,
    pub pattern: Pattern,
    pub reply: Reply,
}

/// Validated pattern/reply pairs from one or more modules
#[derive(Clone, Debug, Default)]
pub struct InteractionTable {
    entries: Vec<TableEntry>,
}

impl InteractionTable {
    /// Build a table, collecting the shape errors of every module.
    ///
    /// Entries keep module order, then name order, which is also the
    /// tie-break order of the resulting matcher.
    pub fn from_modules(
        modules: impl IntoIterator<Item = PatternModule>,
    ) -> Result<Self, TableError> {
        let modules: Vec<PatternModule> = modules.into_iter().collect();
        let errors: Vec<PatternShapeError> =
            modules.iter().flat_map(PatternModule::shape_errors).collect();
        if !errors.is_empty() {
            return Err(TableError::Shape(errors));
        }

        let mut entries = Vec::new();
        for module in modules {
            let PatternModule {
                source,
                declarations,
                mut actions,
            } = module;
            for (name, pattern) in declarations.into_iter().flatten() {
                if let Some(reply) = actions.remove(&name) {
                    entries.push(TableEntry {
                        module: source.clone(),
                        name,
                        pattern: Pattern::compile(pattern),
                        reply,
                    });
                }
            }
        }
        debug!(entries = entries.len(), "built interaction table");
        Ok(Self { entries })
    }

    /// Load one table file
    pub fn load(path: &Path) -> Result<Self, TableError> {
        Self::from_modules([PatternModule::load(path)?])
    }

    /// Load every `.toml` and `.json` file in `dir`, in file name order
    pub fn load_dir(dir: &Path) -> Result<Self, TableError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|e| e == "toml" || e == "json")
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut modules = Vec::new();
        let mut errors = Vec::new();
        for path in paths {
            match PatternModule::load(&path) {
                Ok(module) => modules.push(module),
                Err(TableError::Shape(mut shape)) => errors.append(&mut shape),
                Err(err) => return Err(err),
            }
        }
        match Self::from_modules(modules) {
            Err(TableError::Shape(mut shape)) => {
                errors.append(&mut shape);
                Err(TableError::Shape(errors))
            }
            _ if !errors.is_empty() => Err(TableError::Shape(errors)),
            result => result,
        }
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index every entry for lookup
    pub fn matcher(&self) -> Matcher {
        let mut matcher = Matcher::new();
        for entry in &self.entries {
            matcher.add(entry.pattern.clone(), entry.reply.clone());
        }
        matcher
    }
}

impl From<InteractionTable> for Matcher {
    fn from(table: InteractionTable) -> Self {
        table.matcher()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
