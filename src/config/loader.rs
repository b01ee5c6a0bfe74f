// src/config/loader.rs

use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_fs(&RealFileSystem, path)
}

/// Same as [`load_from_path`], reading through the given filesystem.
pub fn load_from_fs(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Parses duration strings.
/// - Checks `max_concurrency >= 1` and that catalog entries are non-empty
///   and unique.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}
