// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure diff rendering and the `rigging` developer tool.

pub mod commands;
pub mod diff;
pub mod output_diagnostic;
pub mod record;

pub use diff::{render_diff, render_failure, render_report};
pub use record::{parse_records, AssertionRecord, Location, RecordError};
