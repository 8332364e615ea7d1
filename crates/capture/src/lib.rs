// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Effect traces and terminal capture for test assertions.
//!
//! This crate holds the values a rigging run produces: the effects a handler
//! emitted, the responses injected back into it, and the bytes a simulated
//! program wrote to its terminal.

mod bytes_serde;
mod effect;
mod output;
mod trace;

pub use effect::{Effect, Fail, Response};
pub use output::{Injection, OutputBuffer, TerminalCapture};
pub use trace::ExecutionTrace;
