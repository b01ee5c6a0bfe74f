// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! These cover harness-internal faults only. A task that fails to launch or
//! exits non-zero is not an error here; it is recorded as a
//! [`TaskFailure`](crate::engine::TaskFailure) inside its outcome.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunallError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Task unit did not finish cleanly: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Outcome channel closed early: expected {expected} outcomes, received {received}")]
    MissingOutcomes { expected: usize, received: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RunallError>;
