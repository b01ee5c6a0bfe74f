// src/config/validate.rs

use std::collections::HashSet;
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunallError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RunallError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let section = raw.config;

        let progress_interval =
            parse_optional_duration("progress_interval", section.progress_interval.as_deref())?;
        let timeout = parse_optional_duration("timeout", section.timeout.as_deref())?;

        if section.max_concurrency == Some(0) {
            return Err(RunallError::ConfigError(
                "[config].max_concurrency must be >= 1 (got 0)".to_string(),
            ));
        }

        if let Some(tasks) = raw.catalog.tasks.as_deref() {
            validate_catalog(tasks)?;
        }

        let interpreter = section.interpreter.map(|program| {
            let program = program.trim().to_string();
            (!program.is_empty()).then_some(program)
        });

        Ok(ConfigFile {
            policy: section.policy,
            output: section.output,
            interpreter,
            progress_interval,
            timeout,
            max_concurrency: section.max_concurrency,
            catalog: raw.catalog.tasks,
        })
    }
}

/// Check that catalog entries are non-blank and appear only once.
pub fn validate_catalog(entries: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.trim().is_empty() {
            return Err(RunallError::ConfigError(
                "catalog entries must not be empty".to_string(),
            ));
        }
        if !seen.insert(entry.as_str()) {
            return Err(RunallError::ConfigError(format!(
                "catalog entry '{}' is listed more than once",
                entry
            )));
        }
    }
    Ok(())
}

fn parse_optional_duration(key: &str, value: Option<&str>) -> Result<Option<Duration>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let duration = parse_duration(value)
        .map_err(|e| RunallError::ConfigError(format!("[config].{key}: {e}")))?;

    if duration.is_zero() {
        return Err(RunallError::ConfigError(format!(
            "[config].{key} must be greater than zero"
        )));
    }

    Ok(Some(duration))
}
