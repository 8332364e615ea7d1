// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The simulated terminal a program runs against.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::env::{FORCE_COLOR, FORCE_HYPERLINK, RIGGING_META_MODE};
use crate::time::{Clock, ClockHandle};
use rigging_capture::OutputBuffer;

/// Output stream handed to a program
#[derive(Clone)]
pub struct Stream {
    target: Target,
    clock: ClockHandle,
}

#[derive(Clone)]
enum Target {
    Buffer(OutputBuffer),
    /// Forward to the real stderr
    Passthrough,
}

impl Stream {
    pub(crate) fn captured(buffer: OutputBuffer, clock: ClockHandle) -> Self {
        Self {
            target: Target::Buffer(buffer),
            clock,
        }
    }

    pub(crate) fn passthrough(clock: ClockHandle) -> Self {
        Self {
            target: Target::Passthrough,
            clock,
        }
    }

    /// Write text; infallible for captured streams
    pub fn print(&self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    pub fn println(&self, text: &str) {
        self.write_bytes(format!("{}\n", text).as_bytes());
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.target, Target::Buffer(_))
    }

    fn write_bytes(&self, data: &[u8]) {
        match &self.target {
            Target::Buffer(buffer) => buffer.write(data, self.clock.now_millis()),
            Target::Passthrough => {
                // Nowhere to report a failed write to the real stderr.
                let _ = io::Write::write_all(&mut io::stderr(), data);
            }
        }
    }
}

impl io::Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.target {
            Target::Buffer(buffer) => {
                buffer.write(buf, self.clock.now_millis());
                Ok(buf.len())
            }
            Target::Passthrough => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.target {
            Target::Buffer(_) => Ok(()),
            Target::Passthrough => io::stderr().flush(),
        }
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("captured", &self.is_captured())
            .finish()
    }
}

/// Input stream fed by the driver's injector
#[derive(Debug)]
pub struct Stdin {
    rx: mpsc::UnboundedReceiver<String>,
    pending: String,
}

impl Stdin {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            rx,
            pending: String::new(),
        }
    }

    /// A stream that is already at end of input
    pub(crate) fn closed() -> Self {
        let (_, rx) = mpsc::unbounded_channel();
        Self::new(rx)
    }

    /// Next line without its trailing newline, or `None` at end of input.
    ///
    /// Waits until a full line has been injected.
    pub async fn read_line(&mut self) -> Option<String> {
        loop {
            if let Some(pos) = self.pending.find('\n') {
                let mut line: String = self.pending.drain(..=pos).collect();
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
                return Some(line);
            }
            match self.rx.recv().await {
                Some(chunk) => self.pending.push_str(&chunk),
                None if self.pending.is_empty() => return None,
                None => return Some(std::mem::take(&mut self.pending)),
            }
        }
    }

    /// Next raw chunk as injected, for programs that read keypresses
    pub async fn read_chunk(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            return Some(std::mem::take(&mut self.pending));
        }
        self.rx.recv().await
    }
}

/// Records the exit code a program asks for; the last request wins
#[derive(Clone, Debug, Default)]
pub(crate) struct ExitSlot(Arc<Mutex<Option<i32>>>);

impl ExitSlot {
    pub(crate) fn set(&self, code: i32) {
        *self.0.lock() = Some(code);
    }

    pub(crate) fn get(&self) -> Option<i32> {
        *self.0.lock()
    }
}

/// Everything a program may touch of its surroundings.
///
/// The driver hands one to the program instead of patching process-wide
/// state, so no global is modified and nothing needs restoring.
#[derive(Debug)]
pub struct Terminal {
    argv: Vec<String>,
    vars: BTreeMap<String, String>,
    settings: Option<Value>,
    stdout: Stream,
    stderr: Stream,
    stdin: Stdin,
    exit: ExitSlot,
}

impl Terminal {
    pub(crate) fn new(
        argv: Vec<String>,
        mut vars: BTreeMap<String, String>,
        settings: Option<Value>,
        stdout: Stream,
        stderr: Stream,
        stdin: Stdin,
        exit: ExitSlot,
    ) -> Self {
        vars.insert(FORCE_COLOR.to_string(), "1".to_string());
        vars.insert(FORCE_HYPERLINK.to_string(), "1".to_string());
        Self {
            argv,
            vars,
            settings,
            stdout,
            stderr,
            stdin,
            exit,
        }
    }

    /// A terminal with no input whose output is discarded
    pub fn detached(argv: Vec<String>, vars: BTreeMap<String, String>) -> Self {
        let clock = ClockHandle::system();
        let sink = OutputBuffer::default();
        Self::new(
            argv,
            vars,
            None,
            Stream::captured(sink.clone(), clock.clone()),
            Stream::captured(sink, clock),
            Stdin::closed(),
            ExitSlot::default(),
        )
    }

    /// Full argument vector: the binary path, then the arguments
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Arguments after the binary path
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Whether the program was started to report its command tree
    pub fn meta_mode(&self) -> bool {
        self.var(RIGGING_META_MODE).is_some_and(|v| !v.is_empty() && v != "0")
    }

    /// Settings overriding the program's own, if the run supplied any
    pub fn settings(&self) -> Option<&Value> {
        self.settings.as_ref()
    }

    /// Both streams report as interactive
    pub fn is_tty(&self) -> bool {
        true
    }

    pub fn stdout(&self) -> Stream {
        self.stdout.clone()
    }

    pub fn stderr(&self) -> Stream {
        self.stderr.clone()
    }

    pub fn stdin(&mut self) -> &mut Stdin {
        &mut self.stdin
    }

    pub fn print(&self, text: &str) {
        self.stdout.print(text);
    }

    pub fn println(&self, text: &str) {
        self.stdout.println(text);
    }

    pub fn eprint(&self, text: &str) {
        self.stderr.print(text);
    }

    pub fn eprintln(&self, text: &str) {
        self.stderr.println(text);
    }

    /// Write `question` to stdout and wait for the answer line
    pub async fn prompt(&mut self, question: &str) -> Option<String> {
        self.stdout.print(question);
        self.stdin.read_line().await
    }

    /// Record an exit code. The program keeps running; returning from the
    /// entry point ends the run.
    pub fn exit(&self, code: i32) {
        self.exit.set(code);
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
