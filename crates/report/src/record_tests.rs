// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn test_parse_records_skips_blank_lines() {
    let input = r#"
{"ok": true, "name": "exit code", "full_name": "greet"}

{"ok": false, "name": "output", "fullname": "greet", "location": {"file": "tests/greet.rs", "line": 12, "column": 5}, "expected": "Hello", "actual": "Hullo"}
"#;
    let records = parse_records(input).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].ok);
    assert_eq!(records[0].location, None);
    assert_eq!(records[1].full_name, "greet");
    assert_eq!(
        records[1].location.as_ref().map(ToString::to_string).as_deref(),
        Some("tests/greet.rs:12:5")
    );
}

#[test]
fn test_parse_error_reports_line() {
    let err = parse_records("{\"ok\": true, \"name\": \"a\", \"full_name\": \"b\"}\n{oops}\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.to_string().starts_with("Invalid assertion record on line 2"));
}
