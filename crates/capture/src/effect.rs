// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Effect, response, and failure values exchanged with a suspended handler.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A recoverable domain failure.
///
/// Fail signals are recorded into traces and capture results; they are never
/// treated as faults.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Fail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured detail to the failure
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A value emitted by a handler at a suspension point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Request for external information or notice of an intended side effect
    Request(Value),
    /// Sentinel asking the scheduler to answer with a [`Fail`]
    TriggerFail,
    /// Terminal failure raised by the handler
    Fail(Fail),
}

impl Effect {
    /// Build a request effect from anything convertible to JSON.
    pub fn request(value: impl Into<Value>) -> Self {
        Self::Request(value.into())
    }

    /// The request payload, if this is a request.
    pub fn as_request(&self) -> Option<&Value> {
        match self {
            Self::Request(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

impl From<Value> for Effect {
    fn from(value: Value) -> Self {
        Self::Request(value)
    }
}

impl From<&str> for Effect {
    fn from(value: &str) -> Self {
        Self::Request(Value::String(value.to_string()))
    }
}

impl From<Fail> for Effect {
    fn from(fail: Fail) -> Self {
        Self::Fail(fail)
    }
}

/// A value injected into a suspended handler to resume it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Implicit leading token that starts the handler
    Start,
    Value(Value),
    Fail(Fail),
}

impl Response {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Unwrap into the carried value, turning an injected failure into an error.
    ///
    /// `Start` carries no value.
    pub fn into_value(self) -> Result<Option<Value>, Fail> {
        match self {
            Self::Start => Ok(None),
            Self::Value(value) => Ok(Some(value)),
            Self::Fail(fail) => Err(fail),
        }
    }
}

impl From<Value> for Response {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Response {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<bool> for Response {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<Fail> for Response {
    fn from(fail: Fail) -> Self {
        Self::Fail(fail)
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
