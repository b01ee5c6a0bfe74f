// src/catalog/mod.rs

//! Catalog resolution: turning catalog entries into runnable task
//! descriptors.
//!
//! An entry whose backing file is missing is skipped with a warning. It is
//! not a failure of the run, and it does not count towards the total used
//! for progress percentages.

pub mod builtin;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::report::Console;

/// Identity of one schedulable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Display name: the entry's file name without its extension.
    pub name: String,
    /// `base_dir.join(entry)`.
    pub path: PathBuf,
}

impl TaskDescriptor {
    pub fn new(base_dir: impl AsRef<Path>, entry: &str) -> Self {
        let path = base_dir.as_ref().join(entry);
        Self {
            name: display_name(&path),
            path,
        }
    }

    /// Directory the task process runs in.
    pub fn working_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// File name with its last extension removed (`jobs/okx.py` -> `okx`).
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Resolve catalog entries against `base_dir`, keeping the catalog order and
/// dropping entries whose path does not exist.
pub fn resolve_catalog(
    fs: &dyn FileSystem,
    base_dir: &Path,
    entries: &[String],
    console: &Console,
) -> Vec<TaskDescriptor> {
    let mut resolved = Vec::with_capacity(entries.len());

    for entry in entries {
        let task = TaskDescriptor::new(base_dir, entry);
        if !fs.exists(&task.path) {
            warn!(entry = %entry, path = ?task.path, "catalog entry not found; skipping");
            console.line(format!("⚠ Skipping {entry} (file not found)"));
            continue;
        }
        debug!(task = %task.name, path = ?task.path, "resolved catalog entry");
        resolved.push(task);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_last_extension_only() {
        assert_eq!(display_name(Path::new("binance.py")), "binance");
        assert_eq!(display_name(Path::new("jobs/okx.py")), "okx");
        assert_eq!(display_name(Path::new("archive.tar.gz")), "archive.tar");
        assert_eq!(display_name(Path::new("plain")), "plain");
    }

    #[test]
    fn working_dir_is_parent_of_path() {
        let task = TaskDescriptor::new("scripts", "a.py");
        assert_eq!(task.path, PathBuf::from("scripts/a.py"));
        assert_eq!(task.working_dir(), Path::new("scripts"));

        let bare = TaskDescriptor {
            name: "a".to_string(),
            path: PathBuf::from("a.py"),
        };
        assert_eq!(bare.working_dir(), Path::new("."));
    }
}
