#![allow(dead_code)]

use std::path::{Path, PathBuf};

use apex_ls_mcp::cache::{ArtifactDescriptor, ZIP_SIGNATURE};
use apex_ls_mcp::config::{LauncherConfig, RawLauncherConfig};

/// Bytes that pass the cache's archive signature check.
pub fn fake_jar(payload: &[u8]) -> Vec<u8> {
    let mut bytes = ZIP_SIGNATURE.to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

/// Builder for `ArtifactDescriptor` to simplify test setup.
pub struct DescriptorBuilder {
    version: String,
    template: String,
    cache_dir: PathBuf,
}

impl DescriptorBuilder {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            version: "1.0.0".to_string(),
            template: "http://127.0.0.1:9/apex-ls-mcp-{jarVersion}.jar".to_string(),
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Point the template at a running fake server, e.g. `ArtifactServer::url_template()`.
    pub fn template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    pub fn build(self) -> ArtifactDescriptor {
        ArtifactDescriptor::new(self.version, self.template, self.cache_dir)
    }
}

/// Builder for a validated `LauncherConfig`.
pub struct ConfigBuilder {
    raw: RawLauncherConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawLauncherConfig::default(),
        }
    }

    pub fn jar_version(mut self, version: &str) -> Self {
        self.raw.jar_version = version.to_string();
        self
    }

    pub fn download_url(mut self, template: &str) -> Self {
        self.raw.download_url = template.to_string();
        self
    }

    pub fn java(mut self, java: impl AsRef<Path>) -> Self {
        self.raw.java = java.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn min_java_major(mut self, major: u32) -> Self {
        self.raw.min_java_major = major;
        self
    }

    pub fn cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.raw.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> LauncherConfig {
        LauncherConfig::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
