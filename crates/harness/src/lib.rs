// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command handler test harness.
//!
//! Exercises command-line handlers with full control over what they observe:
//! the responses to the effects they emit, the lines typed into their input,
//! and the terminal they write to.
//!
//! Two execution models share one resolution engine:
//!
//! - [`scheduler::run`] steps a handler one effect at a time, answering from
//!   a script and an optional [`Matcher`], and returns the ordered
//!   [`ExecutionTrace`].
//! - [`TerminalDriver::run`] runs a whole [`Program`] against a simulated
//!   [`Terminal`], types scripted lines whenever the program goes quiet, and
//!   returns the [`TerminalCapture`].
//!
//! [`CmdHarness`] and [`CliHarness`] wrap both behind command-path lookup.

pub mod effects;
pub mod env;
pub mod flags;
pub mod harness;
pub mod matcher;
pub mod pattern;
pub mod program;
pub mod resolve;
pub mod scheduler;
pub mod table;
pub mod terminal;
pub mod time;
pub mod tree;

#[cfg(test)]
mod test_helpers;

pub use effects::{Effects, Fault, Handler, HandlerResult, Inputs, Raised};
pub use flags::{FlagValue, ParsedArgs};
pub use harness::{extract_metadata, CliHarness, CliRun, CmdHarness, CmdRun, HarnessError};
pub use matcher::{Matcher, Reply};
pub use pattern::Pattern;
pub use program::{Loader, Overrides, Program, ProgramFn, Settled, StaticLoader};
pub use resolve::{resolve, Resolution, ResolutionError};
pub use scheduler::SchedulerError;
pub use table::{InteractionTable, PatternModule, PatternShapeError, TableError};
pub use terminal::{DriverError, DriverOptions, InputScript, Terminal, TerminalDriver};
pub use tree::{CommandNode, CommandTree, FlagKind, FlagSpec, TreeDescription, TreeError};

pub use rigging_capture::{Effect, ExecutionTrace, Fail, Injection, Response, TerminalCapture};
