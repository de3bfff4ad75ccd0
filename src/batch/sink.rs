// src/batch/sink.rs

//! Write-only destination for per-job log lines.

use tracing::{error, info};

/// Severity-tagged sink the orchestrator reports through.
pub trait LogSink: Send {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Default sink: forwards every line to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&mut self, message: &str) {
        info!(target: "vc6batch::batch", "{}", message);
    }

    fn error(&mut self, message: &str) {
        error!(target: "vc6batch::batch", "{}", message);
    }
}
