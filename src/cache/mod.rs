// src/cache/mod.rs

//! Local artifact cache: one JAR plus one version marker.
//!
//! The cache is read-only from here. The installer owns every write; see
//! [`crate::install`].
//!
//! No lock is taken over the cache directory. Two launchers that both see a
//! stale cache will both refetch and the last writer wins. Because the
//! artifact is always fully written before the marker is renamed into place,
//! a reader can at worst observe an old marker next to a new artifact, which
//! only causes another refetch.

pub mod descriptor;

use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fs::{FileSystem, RealFileSystem};

pub use descriptor::{ARTIFACT_FILE_NAME, ArtifactDescriptor, VERSION_MARKER_FILE_NAME};

/// Local file header signature shared by every ZIP-family archive (`PK\x03\x04`).
pub const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Snapshot of what is on disk, computed fresh on every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheState {
    pub artifact_present: bool,
    pub marker_present: bool,
    pub marker_version: Option<String>,
    /// Only inspected when the marker matches; `false` otherwise.
    pub artifact_structurally_valid: bool,
}

impl CacheState {
    pub fn is_usable(&self, expected_version: &str) -> bool {
        self.artifact_present
            && self.marker_version.as_deref() == Some(expected_version)
            && self.artifact_structurally_valid
    }

    /// The marker matches but the archive signature does not.
    pub fn is_corrupted(&self, expected_version: &str) -> bool {
        self.artifact_present
            && self.marker_version.as_deref() == Some(expected_version)
            && !self.artifact_structurally_valid
    }
}

/// Decides whether a cached artifact can be launched as-is.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    fs: Arc<dyn FileSystem>,
}

impl Default for ArtifactCache {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ArtifactCache {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Trimmed marker contents, or `None` when the marker is missing or unreadable.
    pub fn current_marker_version(&self, descriptor: &ArtifactDescriptor) -> Option<String> {
        let path = descriptor.version_marker_path();
        if !self.fs.is_file(path) {
            return None;
        }
        match self.fs.read_to_string(path) {
            Ok(contents) => Some(contents.trim().to_string()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "version marker unreadable");
                None
            }
        }
    }

    pub fn state(&self, descriptor: &ArtifactDescriptor) -> CacheState {
        let artifact_present = self.fs.is_file(descriptor.artifact_path());
        let marker_present = self.fs.is_file(descriptor.version_marker_path());
        let marker_version = self.current_marker_version(descriptor);

        let marker_matches = marker_version.as_deref() == Some(descriptor.expected_version());
        let artifact_structurally_valid =
            artifact_present && marker_matches && self.has_archive_signature(descriptor);

        let state = CacheState {
            artifact_present,
            marker_present,
            marker_version,
            artifact_structurally_valid,
        };
        debug!(
            expected = %descriptor.expected_version(),
            ?state,
            "computed cache state"
        );
        state
    }

    pub fn is_usable(&self, descriptor: &ArtifactDescriptor) -> bool {
        self.state(descriptor)
            .is_usable(descriptor.expected_version())
    }

    fn has_archive_signature(&self, descriptor: &ArtifactDescriptor) -> bool {
        let path = descriptor.artifact_path();
        let reader = match self.fs.open_read(path) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cached artifact unreadable");
                return false;
            }
        };
        starts_with_zip_signature(reader)
    }
}

/// Read at most four bytes and compare them with [`ZIP_SIGNATURE`].
pub fn starts_with_zip_signature(reader: impl Read) -> bool {
    let mut head = Vec::with_capacity(ZIP_SIGNATURE.len());
    match reader.take(ZIP_SIGNATURE.len() as u64).read_to_end(&mut head) {
        Ok(_) => head == ZIP_SIGNATURE,
        Err(_) => false,
    }
}
