use std::str::FromStr;

use serde::Deserialize;

/// What the orchestrator does after a job that did not succeed.
///
/// - `StopOnError`: abandon the remaining jobs (default behaviour).
/// - `RunAll`: keep going; the batch result is the AND of every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStrategy {
    StopOnError,
    RunAll,
}

impl BatchStrategy {
    pub fn from_stop_on_error(stop_on_error: bool) -> Self {
        if stop_on_error {
            BatchStrategy::StopOnError
        } else {
            BatchStrategy::RunAll
        }
    }

    pub fn stops_on_error(self) -> bool {
        matches!(self, BatchStrategy::StopOnError)
    }
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::StopOnError
    }
}

impl FromStr for BatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "stop" | "stop_on_error" => Ok(BatchStrategy::StopOnError),
            "continue" | "run_all" => Ok(BatchStrategy::RunAll),
            other => Err(format!(
                "invalid batch strategy: {other} (expected \"stop_on_error\" or \"run_all\")"
            )),
        }
    }
}

/// Batch-level values used when a job leaves the matching field empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDefaults {
    pub platform: String,
    pub configuration: String,
    /// Empty means the tool's own default (build).
    pub action: String,
}

pub const DEFAULT_PLATFORM: &str = "Win32";
pub const DEFAULT_CONFIGURATION: &str = "Debug";

impl Default for BuildDefaults {
    fn default() -> Self {
        Self {
            platform: DEFAULT_PLATFORM.to_string(),
            configuration: DEFAULT_CONFIGURATION.to_string(),
            action: String::new(),
        }
    }
}
