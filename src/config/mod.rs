// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to the packaged defaults
//!   (`loader.rs`).
//! - Validate basic invariants like the URL template placeholder
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{CONFIG_ENV_VAR, load_config, load_from_path};
pub use model::{
    DEFAULT_DOWNLOAD_URL, DEFAULT_JAR_VERSION, LauncherConfig, MIN_JAVA_MAJOR,
    RawLauncherConfig, VERSION_PLACEHOLDER,
};
