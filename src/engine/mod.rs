// src/engine/mod.rs

//! Orchestration engine for runall.
//!
//! This module ties together:
//! - the outcome types every executor produces
//! - the [`scheduler`], which drives resolved tasks sequentially or in
//!   parallel
//! - the [`progress`] counter and periodic reporter observed during a
//!   parallel run

use std::time::Duration;

use thiserror::Error;

pub mod progress;
pub mod scheduler;

pub use progress::{CompletionCounter, ProgressReporter, ProgressSnapshot};
pub use scheduler::{CompletedRun, Scheduler, SchedulerOptions};

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Why a task did not succeed.
///
/// Task-level failures are data, never control flow: the executor turns each
/// of these into a failed [`TaskOutcome`] and the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    /// The process could not be started at all.
    #[error("failed to launch: {0}")]
    Launch(String),

    /// The process exited with a non-zero code.
    #[error("exit status {0}")]
    Exit(i32),

    /// The process was terminated by a signal.
    #[error("signal: {0}")]
    Signal(i32),

    /// Waiting for the process or reading its output failed.
    #[error("waiting for process: {0}")]
    Wait(String),

    /// The per-task timeout elapsed and the process was killed.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of executing one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub name: TaskName,
    /// Wall-clock time from launch to termination.
    pub duration: Duration,
    /// Present iff the task failed.
    pub error: Option<TaskFailure>,
    /// Combined stdout + stderr in buffered mode; empty when streamed.
    pub output: String,
}

impl TaskOutcome {
    pub fn new(
        name: impl Into<TaskName>,
        duration: Duration,
        error: Option<TaskFailure>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            error,
            output: output.into(),
        }
    }

    pub fn succeeded(name: impl Into<TaskName>, duration: Duration, output: impl Into<String>) -> Self {
        Self::new(name, duration, None, output)
    }

    pub fn failed(
        name: impl Into<TaskName>,
        duration: Duration,
        failure: TaskFailure,
        output: impl Into<String>,
    ) -> Self {
        Self::new(name, duration, Some(failure), output)
    }

    /// True iff the process terminated normally with status zero.
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}
