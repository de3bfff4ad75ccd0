// src/env.rs

//! Injected view of environment variables.
//!
//! The tool locator never reads `std::env` directly; the batch entry point
//! hands it an [`Environment`] so lookups are explicit and testable.

use std::collections::HashMap;
use std::fmt::Debug;

/// Abstract environment-variable source.
pub trait Environment: Send + Sync + Debug {
    /// Value of `name`, or `None` when unset or not valid Unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// Implementation backed by the current process environment.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, used by tests and by callers that snapshot the
/// environment once at batch start.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
