// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error and warning lines for the developer tool.
//!
//! Multi-line messages (such as every shape error of a table) get one
//! prefixed line each. Colored when stderr is a terminal.

use std::io::{self, IsTerminal, Write};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Print an error message to stderr.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_prefixed(&mut io::stderr(), "Error", RED, msg, is_tty);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_prefixed(&mut io::stderr(), "Warning", YELLOW, msg, is_tty);
}

fn write_prefixed<W: Write>(
    writer: &mut W,
    label: &str,
    color: &str,
    msg: impl std::fmt::Display,
    is_terminal: bool,
) {
    let text = msg.to_string();
    let lines: Vec<&str> = if text.is_empty() {
        vec![""]
    } else {
        text.lines().collect()
    };
    for line in lines {
        // A failed write to stderr has nowhere to be reported.
        let _ = if is_terminal {
            writeln!(writer, "{}{}: {}{}", color, label, line, RESET)
        } else {
            writeln!(writer, "{}: {}", label, line)
        };
    }
}

#[cfg(test)]
#[path = "output_diagnostic_tests.rs"]
mod tests;
