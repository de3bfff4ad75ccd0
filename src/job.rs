// src/job.rs

//! Job descriptors and the classified result of running one.

use std::path::{Path, PathBuf};

/// Immutable description of one build request.
///
/// Empty `platform` / `configuration` / `action` mean "use the batch default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub project: PathBuf,
    pub platform: String,
    pub configuration: String,
    pub action: String,
}

impl JobDescriptor {
    pub fn new(project: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            platform: String::new(),
            configuration: String::new(),
            action: String::new(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// File name of the project with its extension stripped.
    ///
    /// Both `/` and `\` are treated as separators so Windows-style paths
    /// behave the same on every host.
    pub fn base_name(&self) -> String {
        let raw = self.project.to_string_lossy();
        let file = raw.rsplit(['/', '\\']).next().unwrap_or_default();
        match file.rfind('.') {
            Some(0) | None => file.to_string(),
            Some(idx) => file[..idx].to_string(),
        }
    }

    /// Directory containing the project file, if the path has one.
    pub fn project_dir(&self) -> Option<&Path> {
        self.project
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Short human label used in log lines.
    pub fn label(&self) -> String {
        self.project.display().to_string()
    }
}

/// Classified outcome of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    ToolFailure,
    TimedOut,
    ToolNotFound,
}

impl JobOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, JobOutcome::Success)
    }
}

/// Result of one job, produced exactly once by the runner.
///
/// Construct through the associated functions so that `outcome == Success`
/// iff `exit_code == Some(0)`, and `TimedOut` always has no exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    exit_code: Option<i32>,
    outcome: JobOutcome,
    stdout: String,
    stderr: String,
    error: Option<String>,
}

impl JobResult {
    /// The process exited on its own; `None` means it was killed by a signal.
    pub fn exited(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        let outcome = match exit_code {
            Some(0) => JobOutcome::Success,
            _ => JobOutcome::ToolFailure,
        };
        Self {
            exit_code,
            outcome,
            stdout,
            stderr,
            error: None,
        }
    }

    pub fn timed_out(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: None,
            outcome: JobOutcome::TimedOut,
            stdout,
            stderr,
            error: None,
        }
    }

    pub fn tool_not_found(tool: &Path) -> Self {
        Self {
            exit_code: None,
            outcome: JobOutcome::ToolNotFound,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(format!("build tool not found: {}", tool.display())),
        }
    }

    /// The process could not be launched or waited on.
    pub fn launch_failed(cause: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            outcome: JobOutcome::ToolFailure,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(cause.into()),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn outcome(&self) -> JobOutcome {
        self.outcome
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Launch / wait failure cause, if the runner hit one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
