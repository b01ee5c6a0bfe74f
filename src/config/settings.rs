// src/config/settings.rs

//! Effective settings for one run.
//!
//! Precedence: CLI flag, then config file, then built-in default.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::builtin::default_catalog;
use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::config::validate::validate_catalog;
use crate::errors::Result;
use crate::types::{OutputMode, SchedulePolicy};

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessSettings {
    pub base_dir: PathBuf,
    pub catalog: Vec<String>,
    pub policy: SchedulePolicy,
    pub output: OutputMode,
    /// `None` executes each task path directly.
    pub interpreter: Option<String>,
    pub progress_interval: Duration,
    pub timeout: Option<Duration>,
    /// `None` means unbounded.
    pub max_concurrency: Option<usize>,
}

impl HarnessSettings {
    /// Built-in defaults for the given base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            catalog: default_catalog(),
            policy: SchedulePolicy::default(),
            output: OutputMode::default(),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            timeout: None,
            max_concurrency: None,
        }
    }

    /// Merge CLI arguments over an optional validated config file.
    pub fn resolve(args: &CliArgs, file: Option<&ConfigFile>) -> Result<Self> {
        let mut settings = Self::new(&args.base_dir);

        if let Some(file) = file {
            settings.apply_file(file);
        }

        if let Some(policy) = args.policy {
            settings.policy = policy;
        }
        if let Some(output) = args.output {
            settings.output = output;
        }
        if args.no_interpreter {
            settings.interpreter = None;
        } else if let Some(program) = &args.interpreter {
            settings.interpreter = Some(program.clone());
        }
        if !args.tasks.is_empty() {
            validate_catalog(&args.tasks)?;
            settings.catalog = args.tasks.clone();
        }
        if let Some(interval) = args.progress_interval {
            settings.progress_interval = interval;
        }
        if let Some(timeout) = args.timeout {
            settings.timeout = Some(timeout);
        }
        if let Some(cap) = args.max_concurrency {
            settings.max_concurrency = Some(NonZeroUsize::get(cap));
        }

        Ok(settings)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(policy) = file.policy {
            self.policy = policy;
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(interpreter) = &file.interpreter {
            self.interpreter = interpreter.clone();
        }
        if let Some(interval) = file.progress_interval {
            self.progress_interval = interval;
        }
        if file.timeout.is_some() {
            self.timeout = file.timeout;
        }
        if file.max_concurrency.is_some() {
            self.max_concurrency = file.max_concurrency;
        }
        if let Some(catalog) = &file.catalog {
            self.catalog = catalog.clone();
        }
    }
}
