// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test entry points.
//!
//! [`CmdHarness`] runs one command's handler directly through the scheduler.
//! [`CliHarness`] runs a whole program through the terminal driver.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::effects::{Handler, Inputs, Raised};
use crate::env::RIGGING_META_MODE;
use crate::flags::ParsedArgs;
use crate::matcher::Matcher;
use crate::program::{LoadError, Loader, Overrides, Program, Settled};
use crate::resolve::{resolve, ResolutionError};
use crate::scheduler::{self, SchedulerError};
use crate::terminal::{DriverError, DriverOptions, InputScript, Terminal, TerminalDriver};
use crate::tree::{CommandTree, TreeDescription};
use rigging_capture::{ExecutionTrace, Response, TerminalCapture};

/// Errors raised by the harness entry points
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("'{path}' did not report a command tree in metadata mode")]
    NotAProgram { path: String },

    #[error("'{path}' raised while reporting its command tree: {source}")]
    Metadata {
        path: String,
        #[source]
        source: Raised,
    },

    #[error("Empty command line")]
    EmptyCommand,
}

/// Runs command handlers of a tree directly
#[derive(Clone, Debug)]
pub struct CmdHarness {
    tree: Arc<CommandTree>,
}

impl CmdHarness {
    pub fn new(tree: CommandTree) -> Self {
        Self {
            tree: Arc::new(tree),
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Resolve `path` (`"render docs"`, `"render.docs"`, optionally followed
    /// by flags) to a runnable command
    pub fn command(&self, path: &str) -> Result<CmdRun, HarnessError> {
        let resolution = resolve(&self.tree, path)?;
        let args = resolution.parse_flags()?;
        let handler = resolution
            .handler()
            .cloned()
            .ok_or_else(|| ResolutionError::NoHandler {
                path: resolution.command_path(),
            })?;
        Ok(CmdRun {
            command: resolution.command_path(),
            handler,
            args,
        })
    }
}

/// A resolved command, ready to run any number of times
#[derive(Clone, Debug)]
pub struct CmdRun {
    command: String,
    handler: Handler,
    args: ParsedArgs,
}

impl CmdRun {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &ParsedArgs {
        &self.args
    }

    /// Run the handler, answering effects from `script` and `table`.
    ///
    /// The flags parsed from the command path replace `inputs.args`.
    pub async fn run(
        &self,
        script: impl IntoIterator<Item = Response>,
        table: Option<&Matcher>,
        inputs: Inputs,
    ) -> Result<ExecutionTrace, HarnessError> {
        debug!(command = %self.command, "running command handler");
        let inputs = inputs.with_args(self.args.clone());
        Ok(scheduler::run(&self.handler, script, table, inputs).await?)
    }
}

/// Runs whole programs produced by a loader
#[derive(Clone)]
pub struct CliHarness {
    loader: Arc<dyn Loader>,
    entry: String,
    driver: TerminalDriver,
}

impl CliHarness {
    pub fn new(loader: Arc<dyn Loader>, entry: impl Into<String>) -> Self {
        Self {
            loader,
            entry: entry.into(),
            driver: TerminalDriver::new(),
        }
    }

    pub fn with_driver(mut self, driver: TerminalDriver) -> Self {
        self.driver = driver;
        self
    }

    /// Load the program for a command line such as `"tool render docs --force"`.
    ///
    /// The first word is the binary name; the rest become its arguments.
    pub fn command(&self, command: &str, overrides: &Overrides) -> Result<CliRun, HarnessError> {
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            return Err(HarnessError::EmptyCommand);
        }
        let program = self.loader.load(&self.entry, overrides)?;
        Ok(CliRun {
            program,
            argv,
            driver: self.driver.clone(),
        })
    }

    /// The command tree the entry program reports in metadata mode
    pub async fn metadata(&self) -> Result<TreeDescription, HarnessError> {
        extract_metadata(self.loader.as_ref(), &self.entry).await
    }
}

impl std::fmt::Debug for CliHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliHarness")
            .field("entry", &self.entry)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

/// A loaded program with its command line
#[derive(Clone)]
pub struct CliRun {
    program: Arc<dyn Program>,
    argv: Vec<String>,
    driver: TerminalDriver,
}

impl CliRun {
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Run the program, typing `lines` into its input
    pub async fn run<I, S>(&self, lines: I, options: &DriverOptions) -> Result<TerminalCapture, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let capture = self
            .driver
            .run(
                self.program.as_ref(),
                self.argv.clone(),
                InputScript::new(lines),
                options,
            )
            .await?;
        Ok(capture)
    }
}

impl std::fmt::Debug for CliRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliRun")
            .field("argv", &self.argv)
            .finish_non_exhaustive()
    }
}

/// Ask the program at `path` for its command tree.
///
/// The program runs with `RIGGING_META_MODE=1` and must settle with
/// [`Settled::Described`].
pub async fn extract_metadata(loader: &dyn Loader, path: &str) -> Result<TreeDescription, HarnessError> {
    let program = loader.load(path, &Overrides::new())?;
    let vars = BTreeMap::from([(RIGGING_META_MODE.to_string(), "1".to_string())]);
    let terminal = Terminal::detached(vec![path.to_string()], vars);

    match program.main(terminal).await {
        Ok(Settled::Described(tree)) => Ok(tree),
        Ok(Settled::Ran) => Err(HarnessError::NotAProgram {
            path: path.to_string(),
        }),
        Err(source) => Err(HarnessError::Metadata {
            path: path.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
