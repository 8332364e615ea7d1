// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by rigging are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

use std::collections::BTreeMap;

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

/// `RIGGING_QUIESCENCE_MS`: Idle time required before injecting the next input line.
pub fn quiescence_ms() -> Option<u64> {
    var_u64(names::RIGGING_QUIESCENCE_MS)
}

/// `RIGGING_TICK_MS`: Interval between input injector checks.
pub fn tick_ms() -> Option<u64> {
    var_u64(names::RIGGING_TICK_MS)
}

/// `RUST_LOG`: Log filter for the developer binary.
pub fn rust_log() -> Option<String> {
    std::env::var(names::RUST_LOG).ok()
}

/// Snapshot of the whole process environment.
pub fn snapshot() -> BTreeMap<String, String> {
    std::env::vars().collect()
}

fn var_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
