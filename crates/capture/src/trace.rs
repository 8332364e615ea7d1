// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Execution trace for direct scheduler runs.

use crate::effect::{Effect, Fail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered record of every effect observed during one scheduled run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<Value>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an effect in emission order
    pub fn record(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Set the summary value the handler produced on termination
    pub fn set_summary(&mut self, summary: Option<Value>) {
        self.summary = summary;
    }

    /// All recorded effects, in order
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Request payloads only, skipping sentinels and failures
    pub fn requests(&self) -> Vec<&Value> {
        self.effects.iter().filter_map(Effect::as_request).collect()
    }

    pub fn summary(&self) -> Option<&Value> {
        self.summary.as_ref()
    }

    /// The failure that ended the run, if any.
    ///
    /// A failure is always the final entry.
    pub fn fail(&self) -> Option<&Fail> {
        match self.effects.last() {
            Some(Effect::Fail(fail)) => Some(fail),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.fail().is_some()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
