// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The scheduler talks to a `TaskExecutor` instead of spawning processes
//! itself. Production code uses [`ProcessExecutor`]; tests provide an
//! implementation that records what was run and fabricates outcomes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::catalog::TaskDescriptor;
use crate::config::HarnessSettings;
use crate::engine::TaskOutcome;
use crate::types::OutputMode;

use super::task_runner::run_task;

/// Trait abstracting how a single task is executed.
///
/// Implementations must never fail at the Rust level for a task-level
/// problem: a task that cannot start or exits non-zero is reported as a
/// failed [`TaskOutcome`].
pub trait TaskExecutor: Send + Sync {
    fn execute(
        &self,
        task: TaskDescriptor,
    ) -> Pin<Box<dyn Future<Output = TaskOutcome> + Send + '_>>;
}

/// How [`ProcessExecutor`] launches and observes a task process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Program invoked with the task path as its only argument. `None` runs
    /// the task path itself.
    pub interpreter: Option<String>,
    pub output: OutputMode,
    /// Kill the process if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl From<&HarnessSettings> for ExecutorOptions {
    fn from(settings: &HarnessSettings) -> Self {
        Self {
            interpreter: settings.interpreter.clone(),
            output: settings.output,
            timeout: settings.timeout,
        }
    }
}

/// Real executor used in production: one OS process per task.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    options: ExecutorOptions,
}

impl ProcessExecutor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }
}

impl TaskExecutor for ProcessExecutor {
    fn execute(
        &self,
        task: TaskDescriptor,
    ) -> Pin<Box<dyn Future<Output = TaskOutcome> + Send + '_>> {
        Box::pin(async move { run_task(&task, &self.options).await })
    }
}
