// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::{OutputMode, SchedulePolicy};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// policy = "parallel"
/// output = "buffered"
/// interpreter = "python3"
/// progress_interval = "10s"
/// timeout = "5m"
/// max_concurrency = 8
///
/// [catalog]
/// tasks = ["binance.py", "kraken.py"]
/// ```
///
/// Every key is optional; unset keys fall through to CLI flags or built-in
/// defaults when [`HarnessSettings`](super::HarnessSettings) are resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Harness behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Task list from `[catalog]`.
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// `"sequential"` or `"parallel"`.
    #[serde(default)]
    pub policy: Option<SchedulePolicy>,

    /// `"streamed"` or `"buffered"`.
    #[serde(default)]
    pub output: Option<OutputMode>,

    /// Program that runs each task file. An empty string means the file is
    /// executed directly.
    #[serde(default)]
    pub interpreter: Option<String>,

    /// Duration string (e.g. `"10s"`) between parallel progress snapshots.
    #[serde(default)]
    pub progress_interval: Option<String>,

    /// Duration string after which a task is killed.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Cap on concurrently running tasks in parallel mode.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    /// Ordered catalog entries, relative to the base directory. When absent
    /// the built-in catalog is used; an explicit empty list runs nothing.
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
}

/// Validated configuration. Built from [`RawConfigFile`] via `TryFrom`, so
/// durations are parsed and limits checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub policy: Option<SchedulePolicy>,
    pub output: Option<OutputMode>,
    /// `Some(None)` means the file explicitly asked for no interpreter.
    pub interpreter: Option<Option<String>>,
    pub progress_interval: Option<Duration>,
    pub timeout: Option<Duration>,
    pub max_concurrency: Option<usize>,
    pub catalog: Option<Vec<String>>,
}
