// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Assertion records consumed by the diff renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a failing assertion was made
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One assertion outcome from a test run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionRecord {
    pub ok: bool,
    pub name: String,
    /// Name of the enclosing test
    #[serde(alias = "fullname")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub expected: String,
    #[serde(default)]
    pub actual: String,
}

#[derive(Debug, Error)]
#[error("Invalid assertion record on line {line}: {source}")]
pub struct RecordError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse JSON lines, skipping blank lines
pub fn parse_records(input: &str) -> Result<Vec<AssertionRecord>, RecordError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| RecordError {
                line: index + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
