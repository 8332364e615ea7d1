// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path).unwrap();

    let vars = [
        ("RIGGING_QUIESCENCE_MS", "RIGGING_QUIESCENCE_MS"),
        ("RIGGING_TICK_MS", "RIGGING_TICK_MS"),
        ("RIGGING_META_MODE", "RIGGING_META_MODE"),
        ("FORCE_COLOR", "FORCE_COLOR"),
        ("FORCE_HYPERLINK", "FORCE_HYPERLINK"),
        ("RUST_LOG", "RUST_LOG"),
    ];

    for (const_name, env_name) in vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";").unwrap();
    }
}
