// src/config/mod.rs

//! Batch file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a batch file from disk (`loader.rs`).
//! - Validate it into a `ConfigFile` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{BatchSection, ConfigFile, DefaultsSection, ProjectConfig, RawConfigFile};
