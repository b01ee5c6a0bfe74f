// src/config/mod.rs

//! Configuration loading and validation for runall.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a typed [`ConfigFile`] (`validate.rs`).
//! - Merge CLI flags, config file and built-in defaults into the
//!   [`HarnessSettings`] a run actually uses (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_fs, load_from_path};
pub use model::{CatalogSection, ConfigFile, ConfigSection, RawConfigFile};
pub use settings::{HarnessSettings, DEFAULT_INTERPRETER, DEFAULT_PROGRESS_INTERVAL};
pub use validate::validate_catalog;
