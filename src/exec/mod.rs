// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`locator`] resolves the build tool executable.
//! - [`args`] renders the tool's command line for one job.
//! - [`runner`] launches the tool, drains stdout/stderr concurrently and
//!   enforces the per-job timeout.
//! - [`backend`] provides the `JobExecutor` trait the orchestrator depends on,
//!   so tests can replace real processes with scripted results.

pub mod args;
pub mod backend;
pub mod locator;
pub mod runner;

pub use backend::{JobExecutor, JobInvocation};
pub use locator::{ToolLocator, find_executable};
pub use runner::ProcessRunner;
