// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal simulation.
//!
//! A program runs against an injected [`Terminal`]: its output lands in a
//! shared buffer, its exit requests are recorded, and scripted lines are
//! typed into its input whenever it has been quiet for long enough.

mod driver;
mod environment;
mod input;

pub use driver::{DriverError, DriverOptions, TerminalDriver, DEFAULT_QUIESCENCE, DEFAULT_TICK};
pub use environment::{Stdin, Stream, Terminal};
pub use input::InputScript;
