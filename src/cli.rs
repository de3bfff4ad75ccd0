// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `vc6batch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vc6batch",
    version,
    about = "Build a list of legacy Visual C++ 6 projects with a per-project timeout.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the batch file (TOML).
    ///
    /// Default: `Vc6Batch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Vc6Batch.toml")]
    pub config: String,

    /// Explicit build tool executable; overrides `[batch].tool_path`.
    #[arg(long, value_name = "PATH")]
    pub tool_path: Option<String>,

    /// Action for projects that don't name one (e.g. REBUILD, CLEAN);
    /// overrides `[batch].default_action`.
    #[arg(long, value_name = "ACTION")]
    pub action: Option<String>,

    /// Per-project timeout in seconds; overrides the batch file.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Attempt every project even after a failure.
    #[arg(long)]
    pub keep_going: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VC6BATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print each command line, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
