// src/exec/runner.rs

//! Run one build-tool process with captured output and a hard timeout.
//!
//! Per job there are three concurrent activities: the child itself and one
//! drain loop per output pipe. The parent waits on the child's exit with a
//! deadline while both drains keep reading, so a chatty child can never block
//! on a full pipe buffer. Drain loops forward each line over a channel owned
//! by this run only, which keeps every line read before a timeout even when a
//! drain has to be abandoned.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::exec::backend::{JobExecutor, JobInvocation};
use crate::exec::locator::is_executable;
use crate::job::JobResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Production [`JobExecutor`] that spawns real processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Terminate the child once its timeout elapses. When false the child is
    /// left running and only its pipes are released.
    pub kill_on_timeout: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            kill_on_timeout: true,
        }
    }
}

impl ProcessRunner {
    pub fn new(kill_on_timeout: bool) -> Self {
        Self { kill_on_timeout }
    }

    /// Run `tool` with `args` and classify the outcome.
    pub async fn run(&self, tool: &Path, args: &str, timeout: Duration) -> JobResult {
        self.run_invocation(&JobInvocation {
            label: tool.display().to_string(),
            tool: tool.to_path_buf(),
            args: args.to_string(),
            working_dir: None,
            timeout,
        })
        .await
    }

    pub async fn run_invocation(&self, inv: &JobInvocation) -> JobResult {
        if !is_executable(&inv.tool) {
            warn!(job = %inv.label, tool = %inv.tool.display(), "build tool not found; not spawning");
            return JobResult::tool_not_found(&inv.tool);
        }

        info!(
            job = %inv.label,
            tool = %inv.tool.display(),
            args = %inv.args,
            timeout_secs = inv.timeout.as_secs(),
            "starting build tool"
        );

        let mut cmd = build_command(&inv.tool, &inv.args);
        if let Some(dir) = &inv.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(self.kill_on_timeout);

        let spawned = cmd
            .spawn()
            .with_context(|| format!("spawning build tool {}", inv.tool.display()));
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                let cause = format!("{err:#}");
                error!(job = %inv.label, error = %cause, "failed to launch build tool");
                return JobResult::launch_failed(cause);
            }
        };

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (err_tx, mut err_rx) = mpsc::unbounded_channel::<String>();
        let out_task = child
            .stdout
            .take()
            .map(|pipe| spawn_drain(pipe, StreamKind::Stdout, inv.label.clone(), out_tx));
        let err_task = child
            .stderr
            .take()
            .map(|pipe| spawn_drain(pipe, StreamKind::Stderr, inv.label.clone(), err_tx));

        let waited = tokio::time::timeout(inv.timeout, child.wait()).await;

        let status = match waited {
            Ok(Ok(status)) => Some(status),
            Ok(Err(err)) => {
                error!(job = %inv.label, error = %err, "failed waiting for build tool");
                let _ = child.start_kill();
                join_drains(out_task, err_task, inv).await;
                return JobResult::launch_failed(format!(
                    "waiting for build tool {}: {err}",
                    inv.tool.display()
                ));
            }
            Err(_elapsed) => None,
        };

        if status.is_none() {
            warn!(
                job = %inv.label,
                timeout_secs = inv.timeout.as_secs(),
                kill = self.kill_on_timeout,
                "build tool timed out"
            );
            if self.kill_on_timeout {
                if let Err(err) = child.kill().await {
                    warn!(job = %inv.label, error = %err, "failed to kill timed-out build tool");
                }
            }
        }

        join_drains(out_task, err_task, inv).await;
        let stdout = collect(&mut out_rx);
        let stderr = collect(&mut err_rx);

        match status {
            Some(status) => {
                debug!(
                    job = %inv.label,
                    exit_code = ?status.code(),
                    stdout_bytes = stdout.len(),
                    stderr_bytes = stderr.len(),
                    "build tool exited"
                );
                JobResult::exited(status.code(), stdout, stderr)
            }
            None => JobResult::timed_out(stdout, stderr),
        }
    }
}

impl JobExecutor for ProcessRunner {
    fn execute(
        &mut self,
        invocation: JobInvocation,
    ) -> Pin<Box<dyn Future<Output = JobResult> + Send + '_>> {
        Box::pin(async move { self.run_invocation(&invocation).await })
    }
}

#[cfg(windows)]
fn build_command(tool: &Path, args: &str) -> Command {
    let mut cmd = Command::new(tool);
    if !args.is_empty() {
        cmd.raw_arg(args);
    }
    cmd
}

#[cfg(not(windows))]
fn build_command(tool: &Path, args: &str) -> Command {
    let mut cmd = Command::new(tool);
    cmd.args(crate::exec::args::split_command_line(args));
    cmd
}

fn spawn_drain<R>(
    pipe: R,
    stream: StreamKind,
    label: String,
    tx: mpsc::UnboundedSender<String>,
) -> JoinHandle<std::io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf).into_owned();
            trace!(job = %label, stream = stream.as_str(), "{}", line.trim_end());
            if tx.send(line).is_err() {
                break;
            }
        }
        Ok(())
    })
}

/// Join both drains, each bounded by the job timeout. A drain still running
/// past that bound is aborted; lines it already forwarded are kept.
async fn join_drains(
    out_task: Option<JoinHandle<std::io::Result<()>>>,
    err_task: Option<JoinHandle<std::io::Result<()>>>,
    inv: &JobInvocation,
) {
    tokio::join!(
        join_drain(out_task, StreamKind::Stdout, inv),
        join_drain(err_task, StreamKind::Stderr, inv),
    );
}

async fn join_drain(
    task: Option<JoinHandle<std::io::Result<()>>>,
    stream: StreamKind,
    inv: &JobInvocation,
) {
    let Some(mut task) = task else {
        return;
    };

    match tokio::time::timeout(inv.timeout, &mut task).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(err))) => {
            warn!(job = %inv.label, stream = stream.as_str(), error = %err, "error reading build tool output");
        }
        Ok(Err(err)) => {
            warn!(job = %inv.label, stream = stream.as_str(), error = %err, "output drain task failed");
        }
        Err(_) => {
            task.abort();
            warn!(
                job = %inv.label,
                stream = stream.as_str(),
                "output pipe still open after deadline; abandoning drain"
            );
        }
    }
}

fn collect(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    let mut text = String::new();
    while let Ok(chunk) = rx.try_recv() {
        text.push_str(&chunk);
    }
    text
}
