// src/logging.rs

//! Logging setup for `runall` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. the `--log-level` flag
//! 2. the `RUNALL_LOG` environment variable, which accepts full
//!    `EnvFilter` directives (e.g. `runall::exec=debug,info`)
//! 3. `info`
//!
//! Logs go to stderr. Stdout is reserved for the console report and, in
//! streamed mode, the tasks' own output.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "RUNALL_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_environment() {
        let filter = build_filter(Some(LogLevel::Debug));
        assert_eq!(filter.to_string(), "debug");
    }
}
