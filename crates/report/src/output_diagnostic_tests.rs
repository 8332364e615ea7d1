// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

fn render(label: &str, color: &str, msg: &str, is_terminal: bool) -> String {
    let mut buf = Vec::new();
    write_prefixed(&mut buf, label, color, msg, is_terminal);
    String::from_utf8(buf).unwrap()
}

#[test]
fn error_plain_text_when_not_terminal() {
    assert_eq!(
        render("Error", RED, "no such table", false),
        "Error: no such table\n"
    );
}

#[test]
fn error_with_ansi_when_terminal() {
    assert_eq!(
        render("Error", RED, "no such table", true),
        "\x1b[31mError: no such table\x1b[0m\n"
    );
}

#[test]
fn warning_with_ansi_when_terminal() {
    assert_eq!(
        render("Warning", YELLOW, "table is empty", true),
        "\x1b[33mWarning: table is empty\x1b[0m\n"
    );
}

#[test]
fn each_line_of_a_message_is_prefixed() {
    assert_eq!(
        render("Error", RED, "first problem\nsecond problem", false),
        "Error: first problem\nError: second problem\n"
    );
}

#[test]
fn empty_message_still_prints_label() {
    assert_eq!(render("Error", RED, "", false), "Error: \n");
}
