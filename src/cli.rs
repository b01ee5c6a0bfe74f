// src/cli.rs

//! CLI argument parsing using `clap`.

use std::num::NonZeroUsize;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::types::{parse_nonzero_duration, OutputMode, SchedulePolicy};

/// Command-line arguments for `runall`.
///
/// Every option that also exists in the config file overrides the file's
/// value when given.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runall",
    version,
    about = "Run a catalog of independent scripts and report an aggregated outcome.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory the catalog entries are resolved against.
    #[arg(value_name = "BASE_DIR", default_value = ".")]
    pub base_dir: String,

    /// Optional config file (TOML) with `[config]` and `[catalog]` sections.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Run tasks one after another, or all at once.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub policy: Option<SchedulePolicy>,

    /// Relay task output live, or capture it for the failure report.
    #[arg(long, value_enum, value_name = "MODE")]
    pub output: Option<OutputMode>,

    /// Program used to run each task file (default: `python3`).
    #[arg(long, value_name = "PROGRAM", conflicts_with = "no_interpreter")]
    pub interpreter: Option<String>,

    /// Execute each task file directly instead of through an interpreter.
    #[arg(long)]
    pub no_interpreter: bool,

    /// Catalog entry to run; repeat to build a catalog. Replaces the
    /// configured or built-in catalog.
    #[arg(long = "task", value_name = "ENTRY")]
    pub tasks: Vec<String>,

    /// Interval between progress snapshots in parallel mode (e.g. `10s`).
    #[arg(long, value_name = "DURATION", value_parser = parse_nonzero_duration)]
    pub progress_interval: Option<Duration>,

    /// Kill any task that runs longer than this (e.g. `5m`).
    #[arg(long, value_name = "DURATION", value_parser = parse_nonzero_duration)]
    pub timeout: Option<Duration>,

    /// Upper bound on concurrently running tasks in parallel mode.
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<NonZeroUsize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNALL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the catalog and print the plan, but don't run anything.
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
