// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted input injection.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::time::{Clock, ClockHandle};
use rigging_capture::{Injection, OutputBuffer};

/// Lines waiting to be typed into a program
#[derive(Clone, Debug, Default)]
pub struct InputScript {
    lines: VecDeque<(usize, String)>,
    /// Send lines verbatim instead of terminating each with `\n`
    raw: bool,
}

impl InputScript {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).enumerate().collect(),
            raw: false,
        }
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn is_exhausted(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Take the next line once output has been quiet for `quiescence_ms`.
    ///
    /// Returns the line's index, the line, and the bytes to inject.
    pub fn poll(
        &mut self,
        now_ms: u64,
        last_activity_ms: u64,
        quiescence_ms: u64,
    ) -> Option<(usize, String, String)> {
        if now_ms.saturating_sub(last_activity_ms) < quiescence_ms {
            return None;
        }
        let (index, line) = self.lines.pop_front()?;
        let payload = if self.raw {
            line.clone()
        } else {
            format!("{}\n", line)
        };
        Some((index, line, payload))
    }
}

/// Timing and recording shared with the injector task
pub(crate) struct Injector {
    pub(crate) clock: ClockHandle,
    pub(crate) output: OutputBuffer,
    pub(crate) stdin: mpsc::UnboundedSender<String>,
    pub(crate) injections: Arc<Mutex<Vec<Injection>>>,
    pub(crate) start_ms: u64,
    pub(crate) tick: Duration,
    pub(crate) quiescence: Duration,
}

impl Injector {
    /// Tick until every line is injected or the program's input is gone.
    ///
    /// An injection counts as activity, so injections are spaced at least one
    /// quiescence period apart.
    pub(crate) fn spawn(self, mut script: InputScript) -> JoinHandle<()> {
        tokio::spawn(async move {
            let quiescence_ms = self.quiescence.as_millis() as u64;
            while !script.is_exhausted() {
                self.clock.sleep(self.tick).await;
                let now = self.clock.now_millis();
                let Some((index, line, payload)) =
                    script.poll(now, self.output.last_activity_ms(), quiescence_ms)
                else {
                    continue;
                };

                self.output.touch(now);
                let at_ms = now.saturating_sub(self.start_ms);
                debug!(index, %line, at_ms, "injecting input");
                self.injections.lock().push(Injection { index, line, at_ms });
                if self.stdin.send(payload).is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
