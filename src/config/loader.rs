// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{LauncherConfig, RawLauncherConfig};
use crate::errors::Result;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV_VAR: &str = "APEX_LS_MCP_CONFIG";

/// Load a configuration file from a given path and return the raw
/// `RawLauncherConfig`.
///
/// This only performs TOML deserialization; semantic validation happens in
/// [`load_config`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawLauncherConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawLauncherConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Resolve and validate the launcher configuration.
///
/// - An explicit `path` must exist.
/// - Otherwise `APEX_LS_MCP_CONFIG` is consulted.
/// - Otherwise the packaged defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<LauncherConfig> {
    let raw = match resolve_config_path(path) {
        Some(path) => {
            debug!(path = %path.display(), "loading launcher config");
            load_from_path(&path)?
        }
        None => {
            debug!("no config file; using packaged defaults");
            RawLauncherConfig::default()
        }
    };
    LauncherConfig::try_from(raw)
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
