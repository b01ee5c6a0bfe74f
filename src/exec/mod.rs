// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running task files, using
//! `tokio::process::Command`, and turning every possible result into a
//! [`TaskOutcome`](crate::engine::TaskOutcome).
//!
//! - [`backend`] provides the `TaskExecutor` trait the scheduler talks to and
//!   the production `ProcessExecutor`; tests substitute a fake executor.
//! - [`task_runner`] launches one process and waits for it, in streamed or
//!   buffered output mode.

pub mod backend;
pub mod task_runner;

pub use backend::{ExecutorOptions, ProcessExecutor, TaskExecutor};
pub use task_runner::run_task;
