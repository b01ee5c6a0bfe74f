// src/report/mod.rs

//! Result aggregation: turning the collected outcomes of a run into a
//! [`RunSummary`], rendering it, and deriving the exit status.

use std::fmt;
use std::time::Duration;

use crate::engine::{CompletedRun, TaskOutcome};

mod console;

pub use console::Console;

/// Aggregate view of one finished run.
///
/// `outcomes` keeps arrival order: catalog order for sequential runs,
/// completion order for parallel runs.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(outcomes: Vec<TaskOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed outcomes, in arrival order.
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.success())
    }

    /// `0` when every task succeeded (including an empty run), `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed() == 0 { 0 } else { 1 }
    }
}

impl From<CompletedRun> for RunSummary {
    fn from(run: CompletedRun) -> Self {
        Self::new(run.outcomes, run.elapsed)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);

        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Execution Summary (Total time: {})",
            format_duration(self.elapsed)
        )?;
        writeln!(f, "{rule}")?;

        for outcome in &self.outcomes {
            if outcome.success() {
                writeln!(f, "✓ {:<15} - {}", outcome.name, format_duration(outcome.duration))?;
            } else {
                writeln!(
                    f,
                    "✗ {:<15} - {} (ERROR)",
                    outcome.name,
                    format_duration(outcome.duration)
                )?;
            }
        }

        writeln!(f, "{thin}")?;
        write!(
            f,
            "Results: {} successful, {} failed",
            self.succeeded(),
            self.failed()
        )?;

        if self.failed() > 0 {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Failed Scripts Details:")?;
            write!(f, "{thin}")?;
            for outcome in self.failures() {
                writeln!(f)?;
                writeln!(f)?;
                writeln!(f, "{}:", outcome.name)?;
                match &outcome.error {
                    Some(err) => write!(f, "Error: {err}")?,
                    None => write!(f, "Error: unknown")?,
                }
                if !outcome.output.is_empty() {
                    writeln!(f)?;
                    write!(f, "Output:\n{}", outcome.output.trim_end())?;
                }
            }
        }

        Ok(())
    }
}

/// Human-readable duration: `350ms`, `4.20s`, `2m3.50s`, `1h2m3s`.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        return format!("{}ms", d.as_millis());
    }
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{:.2}s", d.as_secs_f64());
    }
    if secs < 3600 {
        let minutes = secs / 60;
        let rest = d.as_secs_f64() - (minutes * 60) as f64;
        return format!("{minutes}m{rest:.2}s");
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{hours}h{minutes}m{}s", secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TaskFailure;

    fn ok(name: &str, secs: u64) -> TaskOutcome {
        TaskOutcome::succeeded(name, Duration::from_secs(secs), "")
    }

    #[test]
    fn formats_durations_by_magnitude() {
        assert_eq!(format_duration(Duration::from_millis(350)), "350ms");
        assert_eq!(format_duration(Duration::from_millis(4200)), "4.20s");
        assert_eq!(format_duration(Duration::from_millis(123_500)), "2m3.50s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
    }

    #[test]
    fn all_successful_run_exits_zero() {
        let summary = RunSummary::new(vec![ok("a", 1), ok("b", 1), ok("c", 1)], Duration::from_secs(2));
        assert_eq!(summary.succeeded(), 3);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.exit_code(), 0);

        let text = summary.to_string();
        assert!(text.contains("Results: 3 successful, 0 failed"), "{text}");
        assert!(!text.contains("Failed Scripts Details"), "{text}");
    }

    #[test]
    fn failure_details_include_cause_and_output() {
        let summary = RunSummary::new(
            vec![
                ok("a", 1),
                TaskOutcome::failed("b", Duration::from_secs(2), TaskFailure::Exit(1), "Traceback...\n"),
            ],
            Duration::from_secs(2),
        );
        assert_eq!(summary.exit_code(), 1);

        let text = summary.to_string();
        assert!(text.contains("Results: 1 successful, 1 failed"), "{text}");
        assert!(text.contains("✗ b"), "{text}");
        assert!(text.contains("Failed Scripts Details:"), "{text}");
        assert!(text.contains("b:\nError: exit status 1"), "{text}");
        assert!(text.contains("Output:\nTraceback..."), "{text}");
    }

    #[test]
    fn empty_output_is_not_rendered() {
        let summary = RunSummary::new(
            vec![TaskOutcome::failed(
                "x",
                Duration::from_millis(5),
                TaskFailure::Launch("No such file or directory".into()),
                "",
            )],
            Duration::from_millis(5),
        );
        let text = summary.to_string();
        assert!(text.contains("Error: failed to launch"), "{text}");
        assert!(!text.contains("Output:"), "{text}");
    }

    #[test]
    fn empty_run_is_a_success() {
        let summary = RunSummary::new(Vec::new(), Duration::ZERO);
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.exit_code(), 0);
        assert!(summary.to_string().contains("Results: 0 successful, 0 failed"));
    }
}
