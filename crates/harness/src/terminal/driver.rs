// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runs a program against a simulated terminal.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::environment::{ExitSlot, Stdin, Stream, Terminal};
use super::input::{InputScript, Injector};
use crate::effects::{Fault, Raised};
use crate::program::Program;
use crate::time::{Clock, ClockHandle};
use rigging_capture::{Injection, OutputBuffer, TerminalCapture};

/// Default idle time before the next line is injected
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(100);

/// Default interval between injector checks
pub const DEFAULT_TICK: Duration = Duration::from_millis(25);

/// Errors that end a simulated run without a capture
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("program fault: {0}")]
    Fault(#[from] Fault),
}

/// Per-run options
#[derive(Clone, Debug, PartialEq)]
pub struct DriverOptions {
    pub quiescence: Duration,
    pub tick: Duration,
    /// Capture stderr into the output; otherwise it reaches the real stderr
    pub stderr: bool,
    /// Inject lines verbatim, without a trailing newline. A script marked
    /// raw is injected verbatim either way.
    pub raw_input: bool,
    /// Settings overriding the program's own
    pub settings: Option<Value>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            quiescence: DEFAULT_QUIESCENCE,
            tick: DEFAULT_TICK,
            stderr: false,
            raw_input: false,
            settings: None,
        }
    }
}

impl DriverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with timing overridden by `RIGGING_QUIESCENCE_MS` and
    /// `RIGGING_TICK_MS` when set
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(ms) = crate::env::quiescence_ms() {
            options.quiescence = Duration::from_millis(ms);
        }
        if let Some(ms) = crate::env::tick_ms() {
            options.tick = Duration::from_millis(ms);
        }
        options
    }

    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }

    pub fn with_raw_input(mut self, raw_input: bool) -> Self {
        self.raw_input = raw_input;
        self
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// Tears a run down however it ends: stops the injector and closes input.
struct Session {
    injector: JoinHandle<()>,
    stdin: Option<mpsc::UnboundedSender<String>>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.injector.abort();
        self.stdin.take();
    }
}

/// Runs programs against simulated terminals.
///
/// The base environment is copied into each run's [`Terminal`] and never
/// modified.
#[derive(Clone, Debug, Default)]
pub struct TerminalDriver {
    base_vars: BTreeMap<String, String>,
    clock: Option<ClockHandle>,
}

impl TerminalDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose base environment is the current process environment
    pub fn from_process_env() -> Self {
        Self::new().with_vars(crate::env::snapshot())
    }

    pub fn with_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.base_vars.extend(vars);
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_vars.insert(name.into(), value.into());
        self
    }

    /// Use `clock` for timestamps and ticks instead of a fresh system clock per run
    pub fn with_clock(mut self, clock: ClockHandle) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn base_vars(&self) -> &BTreeMap<String, String> {
        &self.base_vars
    }

    /// Run `program` with `argv` (binary path first), typing `lines` as the
    /// program goes quiet.
    ///
    /// A timeout-class fault ends the run with exit code 1. A raised
    /// [`Fail`](rigging_capture::Fail) is recorded and, unless the program
    /// asked for an exit code, also exits 1. Any other fault is returned.
    pub async fn run(
        &self,
        program: &dyn Program,
        argv: Vec<String>,
        lines: InputScript,
        options: &DriverOptions,
    ) -> Result<TerminalCapture, DriverError> {
        let clock = self.clock.clone().unwrap_or_else(ClockHandle::system);
        let start_ms = clock.now_millis();
        let output = OutputBuffer::new(start_ms);
        let exit = ExitSlot::default();
        let injections: Arc<Mutex<Vec<Injection>>> = Arc::default();
        let (stdin_tx, stdin_rx) = mpsc::unbounded_channel();

        let stderr = if options.stderr {
            Stream::captured(output.clone(), clock.clone())
        } else {
            Stream::passthrough(clock.clone())
        };
        let terminal = Terminal::new(
            argv,
            self.base_vars.clone(),
            options.settings.clone(),
            Stream::captured(output.clone(), clock.clone()),
            stderr,
            Stdin::new(stdin_rx),
            exit.clone(),
        );

        debug!(lines = lines.remaining(), "starting terminal run");
        let injector = Injector {
            clock,
            output: output.clone(),
            stdin: stdin_tx.clone(),
            injections: Arc::clone(&injections),
            start_ms,
            tick: options.tick,
            quiescence: options.quiescence,
        };
        let raw = lines.is_raw() || options.raw_input;
        let session = Session {
            injector: injector.spawn(lines.raw(raw)),
            stdin: Some(stdin_tx),
        };

        let outcome = program.main(terminal).await;
        drop(session);

        let mut capture = TerminalCapture {
            exit_code: 0,
            output: Vec::new(),
            injections: std::mem::take(&mut *injections.lock()),
            fail: None,
        };
        match outcome {
            Ok(_) => capture.exit_code = exit.get().unwrap_or(0),
            Err(Raised::Fail(fail)) => {
                debug!(message = %fail.message, "program failed");
                capture.exit_code = exit.get().unwrap_or(1);
                capture.fail = Some(fail);
            }
            Err(Raised::Fault(fault)) if fault.is_timeout() => {
                warn!(%fault, "program timed out, reporting exit code 1");
                capture.exit_code = 1;
            }
            Err(Raised::Fault(fault)) => return Err(DriverError::Fault(fault)),
        }
        capture.output = output.contents();
        Ok(capture)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
