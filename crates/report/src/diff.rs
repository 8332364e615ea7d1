// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Character-level rendering of failed assertions for a terminal.
//!
//! Removed text is struck through, added text is inverted. A span that is
//! nothing but an ANSI escape sequence would be invisible, so it is marked
//! with `§`.

use similar::{ChangeTag, TextDiff};

use crate::record::AssertionRecord;

const RESET: &str = "\x1b[0m";
const ESCAPE_MARKER: char = '§';
const RULE_WIDTH: usize = 34;

fn strike(s: &str) -> String {
    format!("\x1b[9m{}\x1b[29m", s)
}

fn inverse(s: &str) -> String {
    format!("\x1b[7m{}\x1b[27m", s)
}

fn italic(s: &str) -> String {
    format!("\x1b[3m{}{}", s, RESET)
}

/// A bare escape sequence such as `ESC[31m`
fn is_bare_escape(span: &str) -> bool {
    span.len() > 2 && span.starts_with('\x1b') && span.ends_with('m')
}

/// Consecutive characters sharing a change tag
fn spans(expected: &str, actual: &str) -> Vec<(ChangeTag, String)> {
    let diff = TextDiff::from_chars(expected, actual);
    let mut spans: Vec<(ChangeTag, String)> = Vec::new();
    for change in diff.iter_all_changes() {
        match spans.last_mut() {
            Some((tag, text)) if *tag == change.tag() => text.push_str(change.value()),
            _ => spans.push((change.tag(), change.value().to_string())),
        }
    }
    spans
}

/// Render the difference between `expected` and `actual`, ending with a reset
pub fn render_diff(expected: &str, actual: &str) -> String {
    let mut out = String::new();
    for (tag, mut span) in spans(expected, actual) {
        if is_bare_escape(&span) {
            span.push(ESCAPE_MARKER);
            if tag == ChangeTag::Delete {
                span.push_str(RESET);
            }
        }
        match tag {
            ChangeTag::Equal => out.push_str(&span),
            ChangeTag::Delete => out.push_str(&strike(&span)),
            ChangeTag::Insert => out.push_str(&inverse(&span)),
        }
    }
    out.push_str(RESET);
    out
}

/// Render one failed assertion: rule, heading, location, rule, diff.
///
/// Passing records render as nothing.
pub fn render_failure(record: &AssertionRecord) -> Option<String> {
    if record.ok {
        return None;
    }
    let rule = strike(&" ".repeat(RULE_WIDTH));
    let mut lines = vec![
        String::new(),
        rule.clone(),
        italic(&format!("{}: {}", record.full_name, record.name)),
    ];
    if let Some(location) = &record.location {
        lines.push(italic(&location.to_string()));
    }
    lines.push(rule);
    lines.push(render_diff(&record.expected, &record.actual));

    let mut out = lines.join("\n");
    out.push('\n');
    Some(out)
}

/// Render every failure; returns the text and how many failures it holds
pub fn render_report<'a>(records: impl IntoIterator<Item = &'a AssertionRecord>) -> (String, usize) {
    let rendered: Vec<String> = records.into_iter().filter_map(render_failure).collect();
    (rendered.concat(), rendered.len())
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
