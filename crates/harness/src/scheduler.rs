// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Direct effect-driven execution of a handler.
//!
//! The scheduler steps a handler one suspension at a time. Each step hands the
//! handler the next queued response, then waits until the handler either
//! emits its next effect or settles. Matched and failure responses jump the
//! queue so they answer the effect that caused them.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, trace};

use crate::effects::{self, Fault, Handler, Inputs, Raised, TRIGGERED_FAIL_MESSAGE};
use crate::matcher::Matcher;
use rigging_capture::{Effect, ExecutionTrace, Fail, Response};

/// Errors that end a scheduled run without a trace
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("handler fault: {0}")]
    Fault(#[from] Fault),
}

/// Result of driving the handler by one step
enum Step {
    Suspended(Effect),
    Settled(Result<Option<serde_json::Value>, Raised>),
}

/// Run `handler` to completion, answering its effects from `script` and
/// `table`.
///
/// The queue starts as `[Start, ...script]`. A `TriggerFail` effect is
/// answered with a [`Fail`]; otherwise a table match answers ahead of the
/// next scripted response. An empty queue answers with nothing.
pub async fn run(
    handler: &Handler,
    script: impl IntoIterator<Item = Response>,
    table: Option<&Matcher>,
    inputs: Inputs,
) -> Result<ExecutionTrace, SchedulerError> {
    let mut queue: VecDeque<Response> = std::iter::once(Response::Start).chain(script).collect();
    let mut trace = ExecutionTrace::new();

    let (mut effects, mut suspension) = effects::channel();
    let handler = handler.clone();
    let computation = async move {
        effects.started().await;
        handler.invoke(effects, inputs).await
    };
    tokio::pin!(computation);

    loop {
        let response = queue.pop_front();
        trace!(?response, "resuming handler");
        // The handler may already have settled without reading; nothing to resume then.
        let _ = suspension.response_tx.send(response).await;

        let step = tokio::select! {
            biased;
            outcome = &mut computation => Step::Settled(outcome),
            Some(effect) = suspension.effect_rx.recv() => Step::Suspended(effect),
        };

        match step {
            Step::Suspended(effect) => {
                debug!(step = trace.len(), ?effect, "handler suspended");
                if matches!(effect, Effect::TriggerFail) {
                    queue.push_front(Response::Fail(Fail::new(TRIGGERED_FAIL_MESSAGE)));
                } else if let Some(response) = table.and_then(|m| m.lookup(&effect)) {
                    trace!(?response, "table matched");
                    queue.push_front(response);
                }
                trace.record(effect);
            }
            Step::Settled(Ok(summary)) => {
                debug!(effects = trace.len(), "handler completed");
                trace.set_summary(summary);
                return Ok(trace);
            }
            Step::Settled(Err(Raised::Fail(fail))) => {
                debug!(message = %fail.message, "handler failed");
                trace.record(Effect::Fail(fail));
                return Ok(trace);
            }
            Step::Settled(Err(Raised::Fault(fault))) => return Err(SchedulerError::Fault(fault)),
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
