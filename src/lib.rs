// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{resolve_catalog, TaskDescriptor};
use crate::cli::CliArgs;
use crate::config::{load_and_validate, HarnessSettings};
use crate::engine::{Scheduler, SchedulerOptions};
use crate::errors::Result;
use crate::exec::{ExecutorOptions, ProcessExecutor, TaskExecutor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::{format_duration, Console, RunSummary};
use crate::types::{OutputMode, SchedulePolicy};

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config loading and CLI overrides
/// - catalog resolution
/// - scheduler + process executor
/// - summary rendering
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<i32> {
    let file = match &args.config {
        Some(path) => Some(load_and_validate(path)?),
        None => None,
    };
    let settings = HarnessSettings::resolve(&args, file.as_ref())?;
    debug!(?settings, "effective settings");

    let console = Console::stdout();

    if args.dry_run {
        let tasks = resolve_catalog(&RealFileSystem, &settings.base_dir, &settings.catalog, &console);
        print_dry_run(&settings, &tasks, &console);
        return Ok(0);
    }

    // Ctrl-C ends the run; children are killed when their handles drop.
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        summary = execute(&settings, &RealFileSystem, console) => Ok(summary?.exit_code()),
        _ = interrupted => {
            warn!("interrupted; abandoning remaining tasks");
            Ok(1)
        }
    }
}

/// Resolve, run and report using the real process executor.
pub async fn execute(
    settings: &HarnessSettings,
    fs: &dyn FileSystem,
    console: Console,
) -> Result<RunSummary> {
    let executor = Arc::new(ProcessExecutor::new(ExecutorOptions::from(settings)));
    execute_with(settings, fs, executor, console).await
}

/// Resolve, run and report with any executor. The summary is printed to
/// `console` and returned.
pub async fn execute_with<E: TaskExecutor + 'static>(
    settings: &HarnessSettings,
    fs: &dyn FileSystem,
    executor: Arc<E>,
    console: Console,
) -> Result<RunSummary> {
    let tasks = resolve_catalog(fs, &settings.base_dir, &settings.catalog, &console);
    info!(
        resolved = tasks.len(),
        catalog = settings.catalog.len(),
        "catalog resolved"
    );

    if settings.output == OutputMode::Streamed
        && settings.policy == SchedulePolicy::Parallel
        && tasks.len() > 1
    {
        warn!("streamed output with parallel policy: task output will interleave");
    }

    let scheduler = Scheduler::new(executor, SchedulerOptions::from(settings), console.clone());
    let summary = RunSummary::from(scheduler.run(tasks).await?);

    console.line(summary.to_string());
    Ok(summary)
}

/// Simple dry-run output: effective settings and the resolved plan.
fn print_dry_run(settings: &HarnessSettings, tasks: &[TaskDescriptor], console: &Console) {
    console.line("runall dry-run");
    console.line(format!("  base_dir = {}", settings.base_dir.display()));
    console.line(format!("  policy = {}", settings.policy));
    console.line(format!("  output = {}", settings.output));
    console.line(format!(
        "  interpreter = {}",
        settings.interpreter.as_deref().unwrap_or("(none)")
    ));
    console.line(format!(
        "  progress_interval = {}",
        format_duration(settings.progress_interval)
    ));
    if let Some(timeout) = settings.timeout {
        console.line(format!("  timeout = {}", format_duration(timeout)));
    }
    if let Some(cap) = settings.max_concurrency {
        console.line(format!("  max_concurrency = {cap}"));
    }
    console.line("");

    console.line(format!("tasks ({} of {}):", tasks.len(), settings.catalog.len()));
    for task in tasks {
        console.line(format!("  - {}", task.name));
        console.line(format!("      path: {}", task.path.display()));
    }

    debug!("dry-run complete (no execution)");
}
