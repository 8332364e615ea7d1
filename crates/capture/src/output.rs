// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared output buffer and terminal capture result.

use crate::bytes_serde;
use crate::effect::Fail;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Output buffer shared between a simulated program's writers and the input
/// injector.
///
/// Every write appends under a single lock and stamps the last-activity time,
/// so the injector can tell when the program has gone quiet.
pub struct OutputBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
    last_activity_ms: Arc<AtomicU64>,
}

impl OutputBuffer {
    /// Create an empty buffer whose last activity is `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Vec::new())),
            last_activity_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Append bytes written at `at_ms`
    pub fn write(&self, data: &[u8], at_ms: u64) {
        let mut bytes = self.bytes.lock();
        bytes.extend_from_slice(data);
        self.last_activity_ms.fetch_max(at_ms, Ordering::SeqCst);
    }

    /// Record activity without output
    pub fn touch(&self, at_ms: u64) {
        self.last_activity_ms.fetch_max(at_ms, Ordering::SeqCst);
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms.load(Ordering::SeqCst)
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }

    /// Everything written so far, decoded lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clone for OutputBuffer {
    fn clone(&self) -> Self {
        Self {
            bytes: Arc::clone(&self.bytes),
            last_activity_ms: Arc::clone(&self.last_activity_ms),
        }
    }
}

/// A scripted line pushed into a simulated program's input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injection {
    /// Position in the scripted lines
    pub index: usize,
    pub line: String,
    /// Milliseconds since the run started
    pub at_ms: u64,
}

/// Result of one terminal simulation run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalCapture {
    pub exit_code: i32,
    #[serde(with = "bytes_serde")]
    pub output: Vec<u8>,
    #[serde(default)]
    pub injections: Vec<Injection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<Fail>,
}

impl TerminalCapture {
    /// Captured output decoded lossily
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
