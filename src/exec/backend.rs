// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The orchestrator talks to a `JobExecutor` instead of spawning processes
//! itself. Production uses [`ProcessRunner`](super::runner::ProcessRunner);
//! tests swap in an executor that returns scripted results without touching
//! the OS.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use crate::job::JobResult;

/// Everything needed to launch the tool once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInvocation {
    /// Label of the originating job, used in log fields.
    pub label: String,
    pub tool: PathBuf,
    /// Full argument string in the tool's own grammar.
    pub args: String,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

/// Trait abstracting how one job is executed.
///
/// Implementations must always produce a classified [`JobResult`]; launch
/// errors are part of the result, never a panic or an `Err`.
pub trait JobExecutor: Send {
    fn execute(
        &mut self,
        invocation: JobInvocation,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + '_>>;
}
