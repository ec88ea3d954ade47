// src/config/validate.rs

use crate::config::model::{LauncherConfig, RawLauncherConfig, VERSION_PLACEHOLDER};
use crate::errors::{LauncherError, Result};

impl TryFrom<RawLauncherConfig> for LauncherConfig {
    type Error = LauncherError;

    fn try_from(raw: RawLauncherConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(LauncherConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawLauncherConfig) -> Result<()> {
    validate_jar_version(cfg)?;
    validate_download_url(cfg)?;
    validate_runtime(cfg)?;
    Ok(())
}

fn validate_jar_version(cfg: &RawLauncherConfig) -> Result<()> {
    let version = cfg.jar_version.trim();
    if version.is_empty() {
        return Err(LauncherError::ConfigError(
            "jar_version must not be empty".to_string(),
        ));
    }
    // The version ends up in a file name and a URL path segment.
    if version.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(LauncherError::ConfigError(format!(
            "jar_version '{}' must not contain whitespace or path separators",
            version
        )));
    }
    Ok(())
}

fn validate_download_url(cfg: &RawLauncherConfig) -> Result<()> {
    let url = cfg.download_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(LauncherError::ConfigError(format!(
            "download_url must be an http(s) URL (got '{}')",
            url
        )));
    }
    if !url.contains(VERSION_PLACEHOLDER) {
        return Err(LauncherError::ConfigError(format!(
            "download_url must contain the {} placeholder (got '{}')",
            VERSION_PLACEHOLDER, url
        )));
    }
    Ok(())
}

fn validate_runtime(cfg: &RawLauncherConfig) -> Result<()> {
    if cfg.java.trim().is_empty() {
        return Err(LauncherError::ConfigError(
            "java must name an executable".to_string(),
        ));
    }
    if cfg.min_java_major == 0 {
        return Err(LauncherError::ConfigError(
            "min_java_major must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
