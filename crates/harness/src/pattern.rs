// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural patterns over effect values.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

/// Key marking a wildcard in pattern files: `{ "$any" = true }`
pub const ANY_KEY: &str = "$any";

/// A structural pattern matched against effect values.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Matches any value
    Any,
    /// Matches a scalar equal to this one
    Exact(Value),
    /// Matches an object carrying every listed key; extra keys are ignored
    Map(BTreeMap<String, Pattern>),
    /// Matches an array of the same length, element-wise
    List(Vec<Pattern>),
}

/// One step of a field path
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, ".{}", key),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Path from the root of a value to one of its fields
pub type FieldPath = Vec<Segment>;

impl Pattern {
    /// Build a pattern from a value, treating `{ "$any": true }` as a wildcard
    /// at any depth.
    pub fn compile(value: Value) -> Self {
        match value {
            Value::Object(map) if is_any_marker(&map) => Self::Any,
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::compile(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.into_iter().map(Self::compile).collect()),
            scalar => Self::Exact(scalar),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Exact(expected), actual) => expected == actual,
            (Self::Map(fields), Value::Object(object)) => fields
                .iter()
                .all(|(key, pattern)| object.get(key).is_some_and(|v| pattern.matches(v))),
            (Self::List(items), Value::Array(values)) => {
                items.len() == values.len()
                    && items.iter().zip(values).all(|(p, v)| p.matches(v))
            }
            _ => false,
        }
    }

    /// Number of exact leaf fields; higher is more specific
    pub fn specificity(&self) -> usize {
        match self {
            Self::Any => 0,
            Self::Exact(_) => 1,
            Self::Map(fields) => fields.values().map(Pattern::specificity).sum(),
            Self::List(items) => items.iter().map(Pattern::specificity).sum(),
        }
    }

    /// Every exact leaf with its field path, in key order
    pub fn leaves(&self) -> Vec<(FieldPath, &Value)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: &mut FieldPath, out: &mut Vec<(FieldPath, &'a Value)>) {
        match self {
            Self::Any => {}
            Self::Exact(value) => out.push((path.clone(), value)),
            Self::Map(fields) => {
                for (key, pattern) in fields {
                    path.push(Segment::Key(key.clone()));
                    pattern.collect_leaves(path, out);
                    path.pop();
                }
            }
            Self::List(items) => {
                for (index, pattern) in items.iter().enumerate() {
                    path.push(Segment::Index(index));
                    pattern.collect_leaves(path, out);
                    path.pop();
                }
            }
        }
    }

    /// Back to a plain value, wildcards as `{ "$any": true }`
    pub fn to_value(&self) -> Value {
        match self {
            Self::Any => {
                let mut map = Map::new();
                map.insert(ANY_KEY.to_string(), Value::Bool(true));
                Value::Object(map)
            }
            Self::Exact(value) => value.clone(),
            Self::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, pattern)| (key.clone(), pattern.to_value()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Pattern::to_value).collect()),
        }
    }
}

/// Literal decomposition: objects become maps, arrays lists, scalars exact.
impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            scalar => Self::Exact(scalar),
        }
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::Exact(Value::String(value.to_string()))
    }
}

/// Every scalar field of `value` with its path. Empty objects and arrays
/// contribute nothing.
pub fn scalar_fields(value: &Value) -> Vec<(FieldPath, &Value)> {
    let mut out = Vec::new();
    collect_scalars(value, &mut Vec::new(), &mut out);
    out
}

fn collect_scalars<'a>(value: &'a Value, path: &mut FieldPath, out: &mut Vec<(FieldPath, &'a Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(Segment::Key(key.clone()));
                collect_scalars(child, path, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                collect_scalars(child, path, out);
                path.pop();
            }
        }
        scalar => out.push((path.clone(), scalar)),
    }
}

fn is_any_marker(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.get(ANY_KEY) == Some(&Value::Bool(true))
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
