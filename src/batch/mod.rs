// src/batch/mod.rs

//! Sequential batch orchestration.
//!
//! One job runs to completion before the next one starts; the build tool is
//! assumed to be single-instance. The orchestrator:
//! - resolves the tool once and refuses to start when it is missing
//! - renders each job's command line and hands it to a [`JobExecutor`]
//! - reports every result through a [`LogSink`]
//! - applies the [`BatchStrategy`] after each non-successful job

pub mod sink;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::env::{Environment, ProcessEnvironment};
use crate::errors::{Result, Vc6BatchError};
use crate::exec::args;
use crate::exec::{JobExecutor, JobInvocation, ProcessRunner, ToolLocator, find_executable};
use crate::job::{JobDescriptor, JobOutcome, JobResult};
use crate::types::{BatchStrategy, BuildDefaults};

pub use sink::{LogSink, TracingSink};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Settings shared by every job in one batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Explicit tool path; empty means "locate it".
    pub tool_path: String,
    pub locator: ToolLocator,
    pub defaults: BuildDefaults,
    pub timeout: Duration,
    pub strategy: BatchStrategy,
    pub kill_on_timeout: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            tool_path: String::new(),
            locator: ToolLocator::default(),
            defaults: BuildDefaults::default(),
            timeout: DEFAULT_TIMEOUT,
            strategy: BatchStrategy::default(),
            kill_on_timeout: true,
        }
    }
}

/// One attempted job and its result.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job: JobDescriptor,
    pub result: JobResult,
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Resolved tool, if resolution succeeded.
    pub tool: Option<PathBuf>,
    /// Attempted jobs in input order.
    pub jobs: Vec<JobReport>,
    /// Set when the strategy cut the batch short.
    pub stopped_early: bool,
    /// Set when the batch never started (tool missing).
    pub config_error: Option<String>,
}

impl BatchReport {
    /// True iff the batch started and every attempted job succeeded.
    pub fn success(&self) -> bool {
        self.config_error.is_none()
            && !self.stopped_early
            && self.jobs.iter().all(|j| j.result.is_success())
    }

    pub fn attempted(&self) -> usize {
        self.jobs.len()
    }
}

pub struct Orchestrator<E, S> {
    config: BatchConfig,
    executor: E,
    sink: S,
    env: Box<dyn Environment>,
}

impl<E: JobExecutor, S: LogSink> Orchestrator<E, S> {
    pub fn new(
        config: BatchConfig,
        executor: E,
        sink: S,
        env: impl Environment + 'static,
    ) -> Self {
        Self {
            config,
            executor,
            sink,
            env: Box::new(env),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Resolve the tool and check that it exists as an executable file.
    ///
    /// The returned path is absolute, since jobs run from their project
    /// directory rather than the launch directory.
    pub fn resolve_tool(&self) -> Result<PathBuf> {
        let resolved = self
            .config
            .locator
            .resolve(&self.config.tool_path, self.env.as_ref());
        let found = find_executable(&resolved, self.env.as_ref())
            .ok_or(Vc6BatchError::ToolNotFound(resolved))?;
        Ok(std::path::absolute(&found)?)
    }

    /// The invocation `job` would run with, without running it.
    ///
    /// When the project directory exists the job runs inside it, and the
    /// project path on the command line is made absolute to match.
    pub fn invocation_for(&self, job: &JobDescriptor, tool: PathBuf) -> JobInvocation {
        let working_dir = job
            .project_dir()
            .filter(|dir| dir.is_dir())
            .and_then(|dir| std::path::absolute(dir).ok());

        let args = match &working_dir {
            Some(_) => match std::path::absolute(&job.project) {
                Ok(project) => {
                    let anchored = JobDescriptor {
                        project,
                        ..job.clone()
                    };
                    args::build(&anchored, &self.config.defaults)
                }
                Err(_) => args::build(job, &self.config.defaults),
            },
            None => args::build(job, &self.config.defaults),
        };

        JobInvocation {
            label: job.label(),
            tool,
            args,
            working_dir,
            timeout: self.config.timeout,
        }
    }

    /// Run every job in order, applying the batch strategy.
    pub async fn run(&mut self, jobs: &[JobDescriptor]) -> BatchReport {
        let mut report = BatchReport::default();

        let tool = match self.resolve_tool() {
            Ok(tool) => tool,
            Err(err) => {
                let message = err.to_string();
                self.sink.error(&message);
                report.config_error = Some(message);
                return report;
            }
        };
        report.tool = Some(tool.clone());

        info!(
            tool = %tool.display(),
            jobs = jobs.len(),
            strategy = ?self.config.strategy,
            "starting batch"
        );

        for (index, job) in jobs.iter().enumerate() {
            let invocation = self.invocation_for(job, tool.clone());
            self.sink
                .info(&format!("Building {}: {}", invocation.label, invocation.args));

            let result = self.executor.execute(invocation).await;
            self.log_result(job, &result);

            let failed = !result.is_success();
            report.jobs.push(JobReport {
                job: job.clone(),
                result,
            });

            if failed && self.config.strategy.stops_on_error() {
                let skipped = jobs.len() - index - 1;
                if skipped > 0 {
                    debug!(skipped, "stopping batch after failed job");
                    report.stopped_early = true;
                }
                break;
            }
        }

        info!(
            attempted = report.attempted(),
            success = report.success(),
            "batch finished"
        );
        report
    }

    fn log_result(&mut self, job: &JobDescriptor, result: &JobResult) {
        let label = job.label();
        match result.outcome() {
            JobOutcome::Success => {
                let stdout = result.stdout().trim_end();
                if !stdout.is_empty() {
                    self.sink.info(stdout);
                }
            }
            JobOutcome::ToolFailure => {
                let stderr = result.stderr().trim_end();
                if !stderr.is_empty() {
                    self.sink.error(stderr);
                }
                match (result.error(), result.exit_code()) {
                    (Some(cause), _) => self.sink.error(&format!("{label}: {cause}")),
                    (None, Some(code)) => {
                        self.sink.error(&format!("{label} failed with exit code {code}"))
                    }
                    (None, None) => self
                        .sink
                        .error(&format!("{label} terminated without an exit code")),
                }
            }
            JobOutcome::TimedOut => {
                self.sink.error(&format!(
                    "{label} timed out after {} seconds",
                    self.config.timeout.as_secs()
                ));
            }
            JobOutcome::ToolNotFound => {
                let cause = result.error().unwrap_or("build tool not found");
                self.sink.error(&format!("{label}: {cause}"));
            }
        }
    }
}

/// Run `jobs` with real processes, `tracing` output and the process
/// environment. Returns the overall success flag.
pub async fn run_batch(jobs: &[JobDescriptor], config: BatchConfig) -> bool {
    let runner = ProcessRunner::new(config.kill_on_timeout);
    let mut orchestrator = Orchestrator::new(config, runner, TracingSink, ProcessEnvironment);
    orchestrator.run(jobs).await.success()
}
