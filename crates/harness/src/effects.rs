// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Handler suspension channel.
//!
//! A handler is an async function that receives an [`Effects`] handle. Each
//! call to [`Effects::emit`] suspends the handler: the effect travels to the
//! scheduler over one channel and the handler waits for exactly one response
//! on the other. Both channels hold a single slot, so emission and resumption
//! strictly alternate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::flags::ParsedArgs;
use rigging_capture::{Effect, Fail, Response};

/// Message carried by the failure the scheduler injects after a trigger.
pub const TRIGGERED_FAIL_MESSAGE: &str = "fail triggered";

/// An unrecoverable error raised by a handler or program
#[derive(Debug, Error)]
pub enum Fault {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Fault {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    /// Whether this fault belongs to the timeout class
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Message(_) => false,
            Self::Other(err) => err.is::<tokio::time::error::Elapsed>(),
        }
    }
}

impl From<tokio::time::error::Elapsed> for Fault {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Timeout(err.to_string())
    }
}

impl From<std::io::Error> for Fault {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

/// What a handler or program raises instead of completing.
///
/// Keeps an expected domain failure apart from a fault.
#[derive(Debug, Error)]
pub enum Raised {
    #[error("failed: {0}")]
    Fail(#[from] Fail),

    #[error(transparent)]
    Fault(#[from] Fault),
}

impl From<tokio::time::error::Elapsed> for Raised {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Fault(err.into())
    }
}

impl From<std::io::Error> for Raised {
    fn from(err: std::io::Error) -> Self {
        Self::Fault(err.into())
    }
}

/// Values a handler is invoked with
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    /// Flags and positionals parsed against the resolved command
    pub args: ParsedArgs,
    /// Named input values
    pub values: Map<String, Value>,
    /// Program settings
    pub settings: Map<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args(mut self, args: ParsedArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn setting(&self, name: &str) -> Option<&Value> {
        self.settings.get(name)
    }
}

/// Outcome of a handler that ran to completion: an optional summary
pub type HandlerResult = Result<Option<Value>, Raised>;

/// Boxed handler computation
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

type HandlerFn = dyn Fn(Effects, Inputs) -> HandlerFuture + Send + Sync;

/// A resumable command handler
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Effects, Inputs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self(Arc::new(move |effects, inputs| -> HandlerFuture {
            Box::pin(f(effects, inputs))
        }))
    }

    /// Start the computation. It does not run until first polled.
    pub fn invoke(&self, effects: Effects, inputs: Inputs) -> HandlerFuture {
        (self.0)(effects, inputs)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handler").finish_non_exhaustive()
    }
}

/// Handler side of the suspension channel
pub struct Effects {
    effect_tx: mpsc::Sender<Effect>,
    response_rx: mpsc::Receiver<Option<Response>>,
}

/// Scheduler side of the suspension channel
pub(crate) struct Suspension {
    pub(crate) effect_rx: mpsc::Receiver<Effect>,
    pub(crate) response_tx: mpsc::Sender<Option<Response>>,
}

/// Create a connected channel pair.
pub(crate) fn channel() -> (Effects, Suspension) {
    let (effect_tx, effect_rx) = mpsc::channel(1);
    let (response_tx, response_rx) = mpsc::channel(1);
    (
        Effects {
            effect_tx,
            response_rx,
        },
        Suspension {
            effect_rx,
            response_tx,
        },
    )
}

impl Effects {
    /// Suspend with `effect` and wait for the response.
    ///
    /// Returns `None` when the scheduler had nothing queued.
    pub async fn emit(&mut self, effect: impl Into<Effect>) -> Option<Response> {
        if self.effect_tx.send(effect.into()).await.is_err() {
            return None;
        }
        self.response_rx.recv().await.flatten()
    }

    /// Emit a request and unwrap the response value.
    ///
    /// An injected [`Fail`] comes back as `Err`, so handlers can raise it with `?`.
    pub async fn ask(&mut self, request: impl Into<Value>) -> Result<Option<Value>, Fail> {
        match self.emit(Effect::Request(request.into())).await {
            Some(response) => response.into_value(),
            None => Ok(None),
        }
    }

    /// Emit the fail sentinel and return the failure the scheduler answers with.
    pub async fn trigger_fail(&mut self) -> Fail {
        match self.emit(Effect::TriggerFail).await {
            Some(Response::Fail(fail)) => fail,
            _ => Fail::new(TRIGGERED_FAIL_MESSAGE),
        }
    }

    /// Wait for the start token before the handler body runs.
    pub(crate) async fn started(&mut self) {
        // The start token carries nothing; it only releases the handler.
        let _ = self.response_rx.recv().await;
    }
}

#[cfg(test)]
#[path = "effects_tests.rs"]
mod tests;
