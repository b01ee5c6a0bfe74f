#![allow(dead_code)]

use std::path::{Path, PathBuf};

use runall::catalog::TaskDescriptor;
use runall::config::{CatalogSection, ConfigFile, ConfigSection, HarnessSettings, RawConfigFile};
use runall::fs::mock::MockFileSystem;
use runall::types::{OutputMode, SchedulePolicy};

/// Builder for a catalog backed by a [`MockFileSystem`].
///
/// Entries added with [`present`](Self::present) get a file under the base
/// directory; entries added with [`missing`](Self::missing) are listed in the
/// catalog only.
pub struct CatalogBuilder {
    base_dir: PathBuf,
    entries: Vec<String>,
    fs: MockFileSystem,
}

impl CatalogBuilder {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            entries: Vec::new(),
            fs: MockFileSystem::new(),
        }
    }

    pub fn present(self, entry: &str) -> Self {
        self.fs.add_file(self.base_dir.join(entry), "");
        self.listed(entry)
    }

    pub fn missing(self, entry: &str) -> Self {
        self.listed(entry)
    }

    fn listed(mut self, entry: &str) -> Self {
        self.entries.push(entry.to_string());
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn fs(&self) -> &MockFileSystem {
        &self.fs
    }

    /// Settings for this catalog with the given policy; everything else
    /// default.
    pub fn settings(&self, policy: SchedulePolicy) -> HarnessSettings {
        let mut settings = HarnessSettings::new(&self.base_dir);
        settings.catalog = self.entries.clone();
        settings.policy = policy;
        settings
    }

    /// Descriptors for every entry, present or not.
    pub fn descriptors(&self) -> Vec<TaskDescriptor> {
        self.entries
            .iter()
            .map(|e| TaskDescriptor::new(&self.base_dir, e))
            .collect()
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                catalog: CatalogSection::default(),
            },
        }
    }

    pub fn policy(mut self, policy: SchedulePolicy) -> Self {
        self.config.config.policy = Some(policy);
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.config.config.output = Some(output);
        self
    }

    pub fn interpreter(mut self, program: &str) -> Self {
        self.config.config.interpreter = Some(program.to_string());
        self
    }

    pub fn progress_interval(mut self, duration: &str) -> Self {
        self.config.config.progress_interval = Some(duration.to_string());
        self
    }

    pub fn timeout(mut self, duration: &str) -> Self {
        self.config.config.timeout = Some(duration.to_string());
        self
    }

    pub fn max_concurrency(mut self, cap: usize) -> Self {
        self.config.config.max_concurrency = Some(cap);
        self
    }

    pub fn task(mut self, entry: &str) -> Self {
        self.config
            .catalog
            .tasks
            .get_or_insert_with(Vec::new)
            .push(entry.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
