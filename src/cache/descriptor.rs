// src/cache/descriptor.rs

use std::path::{Path, PathBuf};

use crate::config::VERSION_PLACEHOLDER;

/// File name of the cached JAR inside the cache directory.
pub const ARTIFACT_FILE_NAME: &str = "apex-ls-mcp.jar";

/// File name of the plain-text version marker inside the cache directory.
pub const VERSION_MARKER_FILE_NAME: &str = "version.txt";

/// Where an artifact comes from and where it lives once cached.
///
/// The artifact and marker paths are always derived from `cache_dir`, so
/// they cannot point outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    expected_version: String,
    remote_location_template: String,
    cache_dir: PathBuf,
    artifact_path: PathBuf,
    version_marker_path: PathBuf,
}

impl ArtifactDescriptor {
    pub fn new(
        expected_version: impl Into<String>,
        remote_location_template: impl Into<String>,
        cache_dir: impl AsRef<Path>,
    ) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        Self {
            expected_version: expected_version.into(),
            remote_location_template: remote_location_template.into(),
            artifact_path: cache_dir.join(ARTIFACT_FILE_NAME),
            version_marker_path: cache_dir.join(VERSION_MARKER_FILE_NAME),
            cache_dir,
        }
    }

    pub fn expected_version(&self) -> &str {
        &self.expected_version
    }

    pub fn remote_location_template(&self) -> &str {
        &self.remote_location_template
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn version_marker_path(&self) -> &Path {
        &self.version_marker_path
    }

    /// The download URL with every placeholder replaced by the expected version.
    pub fn remote_location(&self) -> String {
        self.remote_location_template
            .replace(VERSION_PLACEHOLDER, &self.expected_version)
    }
}
