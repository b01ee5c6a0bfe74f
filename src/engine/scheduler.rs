// src/engine/scheduler.rs

//! Drives resolved tasks through a [`TaskExecutor`].
//!
//! Two policies:
//! - **Sequential**: catalog order, one process at a time, progress printed
//!   at every task boundary.
//! - **Parallel**: one Tokio task per descriptor, all started together
//!   (optionally limited by a semaphore). Outcomes travel over an mpsc
//!   channel sized for every outcome, a shared [`CompletionCounter`] feeds
//!   the periodic [`ProgressReporter`], and the run only returns once every
//!   unit has been joined. Units live in a [`JoinSet`], so dropping the run
//!   aborts them, and their children die with them.
//!
//! Either way, each submitted descriptor yields exactly one outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::catalog::TaskDescriptor;
use crate::config::HarnessSettings;
use crate::errors::{Result, RunallError};
use crate::exec::TaskExecutor;
use crate::report::{format_duration, Console};
use crate::types::SchedulePolicy;

use super::progress::{CompletionCounter, ProgressReporter, ProgressSnapshot};
use super::TaskOutcome;

/// Scheduling knobs taken from [`HarnessSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub policy: SchedulePolicy,
    /// Parallel mode only. `None` launches every task at once.
    pub max_concurrency: Option<usize>,
    /// Parallel mode only.
    pub progress_interval: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            policy: SchedulePolicy::default(),
            max_concurrency: None,
            progress_interval: Duration::from_secs(10),
        }
    }
}

impl From<&HarnessSettings> for SchedulerOptions {
    fn from(settings: &HarnessSettings) -> Self {
        Self {
            policy: settings.policy,
            max_concurrency: settings.max_concurrency,
            progress_interval: settings.progress_interval,
        }
    }
}

/// Everything the aggregator needs from a finished run.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    /// Catalog order (sequential) or completion order (parallel).
    pub outcomes: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

pub struct Scheduler<E: TaskExecutor> {
    executor: Arc<E>,
    options: SchedulerOptions,
    console: Console,
}

impl<E: TaskExecutor> std::fmt::Debug for Scheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: TaskExecutor + 'static> Scheduler<E> {
    pub fn new(executor: Arc<E>, options: SchedulerOptions, console: Console) -> Self {
        Self {
            executor,
            options,
            console,
        }
    }

    /// Run every task and collect one outcome per task.
    ///
    /// Task failures are part of the returned outcomes. An `Err` means the
    /// harness itself broke (a unit panicked, outcomes went missing).
    pub async fn run(&self, tasks: Vec<TaskDescriptor>) -> Result<CompletedRun> {
        let total = tasks.len();
        let started = Instant::now();

        self.console.line(format!(
            "Starting {} execution of {} tasks...",
            self.options.policy, total
        ));
        self.console.line("=".repeat(61));
        info!(policy = %self.options.policy, total, "run started");

        let outcomes = match self.options.policy {
            SchedulePolicy::Sequential => self.run_sequential(tasks, started).await,
            SchedulePolicy::Parallel => self.run_parallel(tasks, started).await?,
        };

        let elapsed = started.elapsed();
        info!(
            total,
            failed = outcomes.iter().filter(|o| !o.success()).count(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "run finished"
        );

        Ok(CompletedRun { outcomes, elapsed })
    }

    async fn run_sequential(&self, tasks: Vec<TaskDescriptor>, started: Instant) -> Vec<TaskOutcome> {
        let total = tasks.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, task) in tasks.into_iter().enumerate() {
            let position = ProgressSnapshot::new(index + 1, total, started.elapsed());
            self.console.line(format!(
                "[{}/{} - {:.1}%] Starting {}...",
                position.completed,
                position.total,
                position.percent(),
                task.name
            ));

            let outcome = self.executor.execute(task).await;
            self.console
                .line(completion_line(&outcome, ProgressSnapshot::new(index + 1, total, started.elapsed())));
            log_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn run_parallel(&self, tasks: Vec<TaskDescriptor>, started: Instant) -> Result<Vec<TaskOutcome>> {
        let total = tasks.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        // Room for every outcome, so no unit ever waits on the channel.
        let (tx, mut rx) = mpsc::channel::<TaskOutcome>(total);
        let counter = CompletionCounter::new();
        let limiter = self
            .options
            .max_concurrency
            .map(|cap| Arc::new(Semaphore::new(cap)));

        let reporter = ProgressReporter::spawn(
            counter.clone(),
            total,
            started,
            self.options.progress_interval,
            self.console.clone(),
        );

        let mut units = JoinSet::new();
        for task in tasks {
            let executor = Arc::clone(&self.executor);
            let tx = tx.clone();
            let counter = counter.clone();
            let console = self.console.clone();
            let limiter = limiter.clone();

            units.spawn(async move {
                // A closed semaphore is never produced here; fall back to
                // running unthrottled rather than dropping the task.
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };

                console.line(format!("Starting {}...", task.name));
                let outcome = executor.execute(task).await;

                let completed = counter.record();
                console.line(completion_line(
                    &outcome,
                    ProgressSnapshot::new(completed, total, started.elapsed()),
                ));
                log_outcome(&outcome);

                tx.send(outcome).await.map_err(anyhow::Error::from)?;
                Ok::<(), RunallError>(())
            });
        }

        // Barrier: every unit is joined, even if an earlier one failed.
        let mut fault: Option<RunallError> = None;
        while let Some(joined) = units.join_next().await {
            let res = match joined {
                Ok(res) => res,
                Err(join_err) => Err(RunallError::from(join_err)),
            };
            if let Err(err) = res {
                warn!(error = %err, "parallel unit failed");
                fault.get_or_insert(err);
            }
        }

        let printed = reporter.stop().await;
        debug!(snapshots = printed, "progress reporter stopped");

        if let Some(err) = fault {
            return Err(err);
        }

        drop(tx);
        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        if outcomes.len() != total {
            return Err(RunallError::MissingOutcomes {
                expected: total,
                received: outcomes.len(),
            });
        }

        Ok(outcomes)
    }
}

fn completion_line(outcome: &TaskOutcome, progress: ProgressSnapshot) -> String {
    match &outcome.error {
        None => format!(
            "✓ {} completed in {} [{}/{} - {:.1}%]",
            outcome.name,
            format_duration(outcome.duration),
            progress.completed,
            progress.total,
            progress.percent()
        ),
        Some(err) => format!(
            "✗ {} failed in {}: {} [{}/{} - {:.1}%]",
            outcome.name,
            format_duration(outcome.duration),
            err,
            progress.completed,
            progress.total,
            progress.percent()
        ),
    }
}

fn log_outcome(outcome: &TaskOutcome) {
    match &outcome.error {
        None => info!(task = %outcome.name, duration = ?outcome.duration, "task completed successfully"),
        Some(err) => warn!(task = %outcome.name, duration = ?outcome.duration, error = %err, "task failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TaskFailure;

    #[test]
    fn completion_lines_show_progress() {
        let ok = TaskOutcome::succeeded("okx", Duration::from_millis(1500), "");
        let line = completion_line(&ok, ProgressSnapshot::new(1, 4, Duration::ZERO));
        assert_eq!(line, "✓ okx completed in 1.50s [1/4 - 25.0%]");

        let bad = TaskOutcome::failed("htx", Duration::from_millis(20), TaskFailure::Exit(2), "");
        let line = completion_line(&bad, ProgressSnapshot::new(4, 4, Duration::ZERO));
        assert_eq!(line, "✗ htx failed in 20ms: exit status 2 [4/4 - 100.0%]");
    }
}
