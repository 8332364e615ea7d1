// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn quiescence_ms_returns_none_when_unset() {
    std::env::remove_var(RIGGING_QUIESCENCE_MS);
    assert_eq!(quiescence_ms(), None);
}

#[test]
#[serial]
fn quiescence_ms_parses_value() {
    std::env::set_var(RIGGING_QUIESCENCE_MS, "250");
    let result = quiescence_ms();
    std::env::remove_var(RIGGING_QUIESCENCE_MS);
    assert_eq!(result, Some(250));
}

#[test]
#[serial]
fn tick_ms_ignores_garbage() {
    std::env::set_var(RIGGING_TICK_MS, "soon");
    let result = tick_ms();
    std::env::remove_var(RIGGING_TICK_MS);
    assert_eq!(result, None);
}

#[test]
fn generated_names_match_variables() {
    assert_eq!(RIGGING_META_MODE, "RIGGING_META_MODE");
    assert_eq!(FORCE_COLOR, "FORCE_COLOR");
    assert_eq!(FORCE_HYPERLINK, "FORCE_HYPERLINK");
}

#[test]
#[serial]
fn snapshot_includes_set_variables() {
    std::env::set_var(RIGGING_TICK_MS, "5");
    let vars = snapshot();
    std::env::remove_var(RIGGING_TICK_MS);
    assert_eq!(vars.get(RIGGING_TICK_MS).map(String::as_str), Some("5"));
}
