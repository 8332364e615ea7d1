// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Program entry points and how they are loaded.
//!
//! A [`Program`] is a whole command-line tool: given a [`Terminal`] it runs to
//! completion. A [`Loader`] produces programs by path, letting a test swap
//! named components for substitutes through [`Overrides`].

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::effects::Raised;
use crate::terminal::Terminal;
use crate::tree::TreeDescription;

/// How a program's entry point finished
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    /// Ran a command
    Ran,
    /// Reported its command tree instead of running (metadata mode)
    Described(TreeDescription),
}

pub type ProgramResult = Result<Settled, Raised>;

pub type ProgramFuture = Pin<Box<dyn Future<Output = ProgramResult> + Send>>;

/// A command-line program's entry point
pub trait Program: Send + Sync {
    fn main(&self, terminal: Terminal) -> ProgramFuture;
}

type EntryFn = dyn Fn(Terminal) -> ProgramFuture + Send + Sync;

/// A program backed by an async function
#[derive(Clone)]
pub struct ProgramFn(Arc<EntryFn>);

impl ProgramFn {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Terminal) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProgramResult> + Send + 'static,
    {
        Self(Arc::new(move |terminal| -> ProgramFuture { Box::pin(f(terminal)) }))
    }
}

impl Program for ProgramFn {
    fn main(&self, terminal: Terminal) -> ProgramFuture {
        (self.0)(terminal)
    }
}

impl std::fmt::Debug for ProgramFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ProgramFn").finish_non_exhaustive()
    }
}

/// Named substitute components handed to a program factory
#[derive(Clone, Default)]
pub struct Overrides {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// The override registered under `name`, if it has type `T`
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let entry = Arc::clone(self.entries.get(name)?);
        entry.downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Overrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("Overrides").field("names", &names).finish()
    }
}

/// Errors raised while loading a program
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No program registered at '{path}'")]
    NotFound { path: String },

    #[error("Failed to build program '{path}': {message}")]
    Factory { path: String, message: String },
}

/// Produces programs by path
pub trait Loader: Send + Sync {
    fn load(&self, path: &str, overrides: &Overrides) -> Result<Arc<dyn Program>, LoadError>;
}

/// Builds a program, consulting overrides for substitute components
pub type Factory = Arc<dyn Fn(&Overrides) -> Result<Arc<dyn Program>, LoadError> + Send + Sync>;

/// A loader over factories registered in code
#[derive(Clone, Default)]
pub struct StaticLoader {
    factories: HashMap<String, Factory>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, path: impl Into<String>, factory: F)
    where
        F: Fn(&Overrides) -> Result<Arc<dyn Program>, LoadError> + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Arc::new(factory));
    }

    pub fn with<F>(mut self, path: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Overrides) -> Result<Arc<dyn Program>, LoadError> + Send + Sync + 'static,
    {
        self.register(path, factory);
        self
    }

    /// Register a program that ignores overrides
    pub fn with_program(self, path: impl Into<String>, program: impl Program + 'static) -> Self {
        let program: Arc<dyn Program> = Arc::new(program);
        self.with(path, move |_| Ok(Arc::clone(&program)))
    }
}

impl Loader for StaticLoader {
    fn load(&self, path: &str, overrides: &Overrides) -> Result<Arc<dyn Program>, LoadError> {
        let factory = self.factories.get(path).ok_or_else(|| LoadError::NotFound {
            path: path.to_string(),
        })?;
        factory(overrides)
    }
}

impl std::fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<&String> = self.factories.keys().collect();
        paths.sort();
        f.debug_struct("StaticLoader").field("paths", &paths).finish()
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
