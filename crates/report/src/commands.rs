// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Developer tool subcommands, writing to any output.

use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::diff::render_report;
use crate::record::{parse_records, RecordError};
use rigging::{InteractionTable, TableError};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Render the failures among the assertion records in `input`.
///
/// Returns the number of failures rendered.
pub fn diff<W: Write>(input: &str, out: &mut W) -> Result<usize, ReportError> {
    let records = parse_records(input)?;
    debug!(records = records.len(), "parsed assertion records");
    let (text, failures) = render_report(&records);
    out.write_all(text.as_bytes())?;
    Ok(failures)
}

/// Load the table at `path` (a file, or a directory of files) and list each
/// pattern with its specificity.
///
/// Returns the number of patterns listed.
pub fn patterns<W: Write>(path: &Path, out: &mut W) -> Result<usize, ReportError> {
    let table = if path.is_dir() {
        InteractionTable::load_dir(path)?
    } else {
        InteractionTable::load(path)?
    };
    for entry in table.entries() {
        writeln!(
            out,
            "{}\t{}\t{}",
            entry.name,
            entry.pattern.specificity(),
            entry.pattern.to_value()
        )?;
    }
    Ok(table.len())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
