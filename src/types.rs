// src/types.rs

//! Small shared value types: scheduling policy, output mode and duration
//! strings as they appear in the config file and on the command line.

use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

/// How resolved tasks are driven through the executor.
///
/// - `Sequential`: catalog order, one process at a time.
/// - `Parallel`: every task launched at once (optionally capped), outcomes
///   arrive in completion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchedulePolicy {
    Sequential,
    #[default]
    Parallel,
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulePolicy::Sequential => f.write_str("sequential"),
            SchedulePolicy::Parallel => f.write_str("parallel"),
        }
    }
}

/// What happens to a child's stdout/stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Child streams are inherited and interleave live with ours.
    Streamed,
    /// Combined stdout + stderr is captured and attached to the outcome.
    #[default]
    Buffered,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Streamed => f.write_str("streamed"),
            OutputMode::Buffered => f.write_str("buffered"),
        }
    }
}

/// Parse a duration string like `"500ms"`, `"10s"`, `"5m"` or `"1h"`.
///
/// Used both as a clap value parser and for config file values.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: {s}"))
}

/// Like [`parse_duration`], but zero is rejected. Used for `--timeout` and
/// `--progress-interval`, which have no meaningful zero value.
pub fn parse_nonzero_duration(s: &str) -> Result<Duration, String> {
    let duration = parse_duration(s)?;
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
