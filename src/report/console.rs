// src/report/console.rs

//! Line-oriented console output.
//!
//! Progress lines and the final report go through a [`Console`] so that the
//! same code can print to stdout in production and be captured in tests.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct Console {
    captured: Option<Arc<Mutex<Vec<String>>>>,
}

impl Console {
    /// Console that prints each line to stdout.
    pub fn stdout() -> Self {
        Self { captured: None }
    }

    /// Console that records lines in memory instead of printing them.
    pub fn capture() -> Self {
        Self {
            captured: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn line(&self, line: impl Into<String>) {
        let line = line.into();
        match &self.captured {
            Some(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(line),
            None => println!("{line}"),
        }
    }

    /// Lines recorded so far; always empty for a stdout console.
    pub fn lines(&self) -> Vec<String> {
        match &self.captured {
            Some(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
            None => Vec::new(),
        }
    }

    /// Recorded lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}
