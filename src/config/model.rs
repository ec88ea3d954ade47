// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::ArtifactDescriptor;
use crate::errors::{LauncherError, Result};

/// Placeholder substituted with the JAR version in `download_url`.
pub const VERSION_PLACEHOLDER: &str = "{jarVersion}";

/// JAR version shipped with this build of the launcher.
pub const DEFAULT_JAR_VERSION: &str = "5.9.0";

/// Release asset location of the standalone JAR.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/apex-dev-tools/apex-ls/releases/download/v{jarVersion}/apex-ls-mcp-{jarVersion}-standalone.jar";

/// Minimum Java major version able to run the analysis engine.
pub const MIN_JAVA_MAJOR: u32 = 17;

/// Name of the per-user cache directory under the home directory.
pub const CACHE_DIR_NAME: &str = ".apex-ls-mcp";

/// Configuration as read from a TOML file.
///
/// Every key is optional:
///
/// ```toml
/// jar_version = "5.9.0"
/// download_url = "https://example.com/apex-ls-mcp-{jarVersion}-standalone.jar"
/// java = "/usr/lib/jvm/java-21/bin/java"
/// min_java_major = 17
/// cache_dir = "/tmp/apex-ls-mcp-cache"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLauncherConfig {
    #[serde(default = "default_jar_version")]
    pub jar_version: String,

    /// URL template; every `{jarVersion}` is replaced before use.
    #[serde(default = "default_download_url")]
    pub download_url: String,

    /// Java executable, resolved through `PATH` when not absolute.
    #[serde(default = "default_java")]
    pub java: String,

    #[serde(default = "default_min_java_major")]
    pub min_java_major: u32,

    /// Overrides `~/.apex-ls-mcp`. Intended for tests and sandboxes.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_jar_version() -> String {
    DEFAULT_JAR_VERSION.to_string()
}

fn default_download_url() -> String {
    DEFAULT_DOWNLOAD_URL.to_string()
}

fn default_java() -> String {
    "java".to_string()
}

fn default_min_java_major() -> u32 {
    MIN_JAVA_MAJOR
}

impl Default for RawLauncherConfig {
    fn default() -> Self {
        Self {
            jar_version: default_jar_version(),
            download_url: default_download_url(),
            java: default_java(),
            min_java_major: default_min_java_major(),
            cache_dir: None,
        }
    }
}

/// Validated launcher configuration.
///
/// Only obtainable through `TryFrom<RawLauncherConfig>` (see `validate.rs`),
/// so holders can rely on the template containing its placeholder.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    jar_version: String,
    download_url: String,
    java: String,
    min_java_major: u32,
    cache_dir: Option<PathBuf>,
}

impl LauncherConfig {
    pub(crate) fn new_unchecked(raw: RawLauncherConfig) -> Self {
        Self {
            jar_version: raw.jar_version.trim().to_string(),
            download_url: raw.download_url,
            java: raw.java,
            min_java_major: raw.min_java_major,
            cache_dir: raw.cache_dir,
        }
    }

    pub fn jar_version(&self) -> &str {
        &self.jar_version
    }

    pub fn java(&self) -> &str {
        &self.java
    }

    pub fn min_java_major(&self) -> u32 {
        self.min_java_major
    }

    /// The cache directory: the configured override, or `~/.apex-ls-mcp`.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(CACHE_DIR_NAME))
            .ok_or_else(|| {
                LauncherError::ConfigError(
                    "cannot determine the home directory for the JAR cache".to_string(),
                )
            })
    }

    /// Build the artifact descriptor for the configured version and cache.
    pub fn descriptor(&self) -> Result<ArtifactDescriptor> {
        let cache_dir = self.cache_dir()?;
        Ok(ArtifactDescriptor::new(
            &self.jar_version,
            &self.download_url,
            &cache_dir,
        ))
    }

    /// Same as [`descriptor`](Self::descriptor) but rooted at `cache_dir`.
    pub fn descriptor_in(&self, cache_dir: &Path) -> ArtifactDescriptor {
        ArtifactDescriptor::new(&self.jar_version, &self.download_url, cache_dir)
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig::new_unchecked(RawLauncherConfig::default())
    }
}
