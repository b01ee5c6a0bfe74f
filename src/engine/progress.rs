// src/engine/progress.rs

//! Progress tracking for a run.
//!
//! - [`CompletionCounter`] is the only shared progress signal: every
//!   parallel unit increments it once, right after its outcome exists.
//! - [`ProgressSnapshot`] is what gets rendered, in both policies.
//! - [`ProgressReporter`] is the periodic observer used in parallel mode. It
//!   only ever reads the counter.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::report::{format_duration, Console};

/// Shared count of finished tasks.
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter(Arc<AtomicUsize>);

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished task and return the updated count.
    pub fn record(&self) -> usize {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn completed(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

/// Point-in-time view of run progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub fn new(completed: usize, total: usize, elapsed: Duration) -> Self {
        Self {
            completed,
            total,
            elapsed,
        }
    }

    /// Completion percentage; an empty run counts as fully complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} completed ({:.1}%) - Elapsed: {}",
            self.completed,
            self.total,
            self.percent(),
            format_duration(self.elapsed)
        )
    }
}

/// Shortest tick period the reporter accepts.
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic progress printer for parallel runs.
///
/// Ticks every `interval` (the first tick one full interval after the run
/// started), raised to [`MIN_PROGRESS_INTERVAL`] if shorter. On each tick
/// it prints a snapshot, unless every task has already completed, in which
/// case it exits. It also exits as soon as [`stop`](Self::stop) is called or
/// the reporter is dropped.
#[derive(Debug)]
pub struct ProgressReporter {
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<usize>,
}

impl ProgressReporter {
    pub fn spawn(
        counter: CompletionCounter,
        total: usize,
        started: Instant,
        interval: Duration,
        console: Console,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let interval = interval.max(MIN_PROGRESS_INTERVAL);

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::from_std(started) + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut printed = 0usize;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let snapshot =
                            ProgressSnapshot::new(counter.completed(), total, started.elapsed());
                        if snapshot.is_complete() {
                            debug!(completed = snapshot.completed, total, "all tasks done; progress reporter exiting");
                            break;
                        }
                        console.line(format!("\n📊 Progress update: {snapshot}"));
                        printed += 1;
                    }
                }
            }
            printed
        });

        Self {
            stop: Some(stop_tx),
            handle,
        }
    }

    /// Stop the reporter and wait until it has exited. Returns how many
    /// snapshots it printed.
    pub async fn stop(mut self) -> usize {
        if let Some(stop) = self.stop.take() {
            // The reporter may already have exited on its own.
            let _ = stop.send(());
        }

        match self.handle.await {
            Ok(printed) => printed,
            Err(err) => {
                warn!(error = %err, "progress reporter did not exit cleanly");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_returns_updated_count() {
        let counter = CompletionCounter::new();
        let shared = counter.clone();
        assert_eq!(counter.record(), 1);
        assert_eq!(shared.record(), 2);
        assert_eq!(counter.completed(), 2);
    }

    #[test]
    fn snapshot_percentages() {
        let half = ProgressSnapshot::new(1, 2, Duration::from_secs(3));
        assert_eq!(half.percent(), 50.0);
        assert!(!half.is_complete());

        let empty = ProgressSnapshot::new(0, 0, Duration::ZERO);
        assert_eq!(empty.percent(), 100.0);
        assert!(empty.is_complete());
    }

    #[tokio::test]
    async fn zero_interval_still_reports() {
        let console = Console::capture();
        let reporter = ProgressReporter::spawn(
            CompletionCounter::new(),
            1,
            Instant::now(),
            Duration::ZERO,
            console.clone(),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        let printed = reporter.stop().await;

        assert!(printed > 0);
        assert_eq!(console.lines().len(), printed);
        assert!(console.text().contains("0/1 completed (0.0%)"));
    }

    #[test]
    fn snapshot_renders_fraction_and_percentage() {
        let snap = ProgressSnapshot::new(3, 4, Duration::from_secs(12));
        let text = snap.to_string();
        assert!(text.starts_with("3/4 completed (75.0%)"), "{text}");
        assert!(text.contains("Elapsed: 12.00s"), "{text}");
    }
}
