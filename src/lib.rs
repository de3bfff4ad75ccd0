// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod job;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::batch::{BatchConfig, Orchestrator, TracingSink, run_batch};
use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::normalize_action;
use crate::env::ProcessEnvironment;
use crate::exec::ProcessRunner;
use crate::job::JobDescriptor;
use crate::types::BatchStrategy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - batch file loading + CLI overrides
/// - tool resolution
/// - the orchestrator with the real process runner
///
/// Returns the overall batch success flag.
pub async fn run(args: CliArgs) -> Result<bool> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let batch = apply_overrides(cfg.batch_config(), &args);
    let jobs = cfg.jobs();

    if args.dry_run {
        print_dry_run(&batch, &jobs);
        return Ok(true);
    }

    Ok(run_batch(&jobs, batch).await)
}

/// Layer CLI flags over the values from the batch file.
pub fn apply_overrides(mut batch: BatchConfig, args: &CliArgs) -> BatchConfig {
    if let Some(ref tool) = args.tool_path {
        batch.tool_path = tool.clone();
    }
    if let Some(ref action) = args.action {
        batch.defaults.action = normalize_action(action);
    }
    if let Some(secs) = args.timeout_secs {
        batch.timeout = Duration::from_secs(secs);
    }
    if args.keep_going {
        batch.strategy = BatchStrategy::RunAll;
    }
    batch
}

/// Simple dry-run output: resolved tool and each command line.
fn print_dry_run(batch: &BatchConfig, jobs: &[JobDescriptor]) {
    let orchestrator = Orchestrator::new(
        batch.clone(),
        ProcessRunner::new(batch.kill_on_timeout),
        TracingSink,
        ProcessEnvironment,
    );

    println!("vc6batch dry-run");
    println!("  strategy = {:?}", batch.strategy);
    println!("  timeout = {}s", batch.timeout.as_secs());

    let tool = match orchestrator.resolve_tool() {
        Ok(tool) => {
            println!("  tool = {}", tool.display());
            tool
        }
        Err(err) => {
            println!("  tool = <missing> ({err})");
            orchestrator
                .config()
                .locator
                .resolve(&batch.tool_path, &ProcessEnvironment)
        }
    };
    println!();

    println!("projects ({}):", jobs.len());
    for job in jobs {
        let inv = orchestrator.invocation_for(job, tool.clone());
        println!("  - {}", inv.label);
        println!("      cmd: \"{}\" {}", inv.tool.display(), inv.args);
        if let Some(ref dir) = inv.working_dir {
            println!("      cwd: {}", dir.display());
        }
    }

    debug!("dry-run complete (no execution)");
}
