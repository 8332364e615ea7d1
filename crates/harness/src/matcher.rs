// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Indexed pattern lookup.
//!
//! Entries are indexed by their exact leaves: `(field path, scalar) -> ids`.
//! A lookup flattens the effect into its scalar fields, counts index hits per
//! entry, and only verifies entries whose every leaf was hit. Patterns with no
//! scalar leaves sit in a short list that is always verified.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::pattern::{scalar_fields, FieldPath, Pattern};
use rigging_capture::{Effect, Fail, Response};

/// Computes a response from the matched effect value
pub type Responder = Arc<dyn Fn(&Value) -> Response + Send + Sync>;

/// What a matched pattern answers with
#[derive(Clone)]
pub enum Reply {
    Respond(Response),
    /// Evaluated only when its pattern is the best match
    Compute(Responder),
}

impl Reply {
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Response + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(f))
    }

    fn produce(&self, value: &Value) -> Response {
        match self {
            Self::Respond(response) => response.clone(),
            Self::Compute(f) => f(value),
        }
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Respond(response) => f.debug_tuple("Respond").field(response).finish(),
            Self::Compute(_) => f.debug_tuple("Compute").finish_non_exhaustive(),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Respond(response)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Respond(Response::Value(value))
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Self::Respond(Response::from(value))
    }
}

impl From<bool> for Reply {
    fn from(value: bool) -> Self {
        Self::Respond(Response::from(value))
    }
}

impl From<Fail> for Reply {
    fn from(fail: Fail) -> Self {
        Self::Respond(Response::Fail(fail))
    }
}

#[derive(Clone, Debug)]
struct Entry {
    pattern: Pattern,
    reply: Reply,
    leaf_count: usize,
    specificity: usize,
}

/// A set of (pattern, reply) pairs with most-specific-wins lookup
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    entries: Vec<Entry>,
    index: HashMap<FieldPath, HashMap<String, Vec<usize>>>,
    unindexed: Vec<usize>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern. Returns its entry id, which doubles as its
    /// registration order.
    pub fn add(&mut self, pattern: impl Into<Pattern>, reply: impl Into<Reply>) -> usize {
        let pattern = pattern.into();
        let id = self.entries.len();
        // Only scalar leaves are indexable; an exact object or array is left
        // to verification.
        let leaves: Vec<_> = pattern
            .leaves()
            .into_iter()
            .filter(|(_, value)| !value.is_object() && !value.is_array())
            .collect();

        if leaves.is_empty() {
            self.unindexed.push(id);
        }
        for (path, scalar) in &leaves {
            self.index
                .entry(path.clone())
                .or_default()
                .entry(scalar_key(scalar))
                .or_default()
                .push(id);
        }

        let entry = Entry {
            leaf_count: leaves.len(),
            specificity: pattern.specificity(),
            reply: reply.into(),
            pattern,
        };
        self.entries.push(entry);
        id
    }

    /// Builder form of [`Matcher::add`]
    pub fn with(mut self, pattern: impl Into<Pattern>, reply: impl Into<Reply>) -> Self {
        self.add(pattern, reply);
        self
    }

    /// Response for an effect. Only requests are matched.
    pub fn lookup(&self, effect: &Effect) -> Option<Response> {
        effect.as_request().and_then(|value| self.lookup_value(value))
    }

    /// Response of the best matching entry for `value`
    pub fn lookup_value(&self, value: &Value) -> Option<Response> {
        let id = self.best_match(value)?;
        trace!(entry = id, "pattern matched");
        Some(self.entries[id].reply.produce(value))
    }

    /// Id of the most specific matching entry; ties go to the earliest.
    pub fn best_match(&self, value: &Value) -> Option<usize> {
        let mut hits: HashMap<usize, usize> = HashMap::new();
        for (path, scalar) in scalar_fields(value) {
            let ids = self
                .index
                .get(&path)
                .and_then(|by_scalar| by_scalar.get(&scalar_key(scalar)));
            for id in ids.into_iter().flatten() {
                *hits.entry(*id).or_default() += 1;
            }
        }

        let candidates = hits
            .into_iter()
            .filter(|(id, count)| *count == self.entries[*id].leaf_count)
            .map(|(id, _)| id)
            .chain(self.unindexed.iter().copied());

        candidates
            .filter(|id| self.entries[*id].pattern.matches(value))
            .max_by(|a, b| {
                self.entries[*a]
                    .specificity
                    .cmp(&self.entries[*b].specificity)
                    .then(b.cmp(a))
            })
    }

    pub fn pattern(&self, id: usize) -> Option<&Pattern> {
        self.entries.get(id).map(|e| &e.pattern)
    }

    /// Patterns in registration order
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.entries.iter().map(|e| &e.pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index key for a scalar; JSON text keeps `"1"` and `1` apart.
fn scalar_key(scalar: &Value) -> String {
    scalar.to_string()
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
