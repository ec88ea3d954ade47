// src/install/mod.rs

//! Installer flow: check the cache, fetch when needed, then write the marker.
//!
//! Ordering is fixed: the cache verdict is computed fresh before any fetch,
//! and the marker is only written after the fetch has fully succeeded.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::cache::{ArtifactCache, ArtifactDescriptor, CacheState};
use crate::errors::Result;
use crate::fetch::ArtifactFetcher;
use crate::fs::{FileSystem, RealFileSystem};

/// Why the cached artifact has to be downloaded again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReason {
    /// No artifact, or no marker next to it.
    Missing,
    /// The marker names another version.
    VersionMismatch { cached: String },
    /// The marker matches but the archive signature does not.
    Corrupted,
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshReason::Missing => write!(f, "not cached"),
            RefreshReason::VersionMismatch { cached } => write!(f, "cached version is v{}", cached),
            RefreshReason::Corrupted => write!(f, "cached JAR is corrupted"),
        }
    }
}

/// What the installer is about to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlan {
    UpToDate,
    Refresh(RefreshReason),
}

impl InstallPlan {
    pub fn from_state(state: &CacheState, expected_version: &str) -> Self {
        if state.is_usable(expected_version) {
            return InstallPlan::UpToDate;
        }
        if state.is_corrupted(expected_version) {
            return InstallPlan::Refresh(RefreshReason::Corrupted);
        }
        match (&state.marker_version, state.artifact_present) {
            (Some(cached), true) if cached != expected_version => {
                InstallPlan::Refresh(RefreshReason::VersionMismatch {
                    cached: cached.clone(),
                })
            }
            _ => InstallPlan::Refresh(RefreshReason::Missing),
        }
    }
}

/// Result of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyCached { version: String },
    Installed { version: String, reason: RefreshReason },
}

/// Brings the cache in line with an [`ArtifactDescriptor`].
#[derive(Debug, Clone)]
pub struct Installer {
    cache: ArtifactCache,
    fetcher: ArtifactFetcher,
    fs: Arc<dyn FileSystem>,
}

impl Installer {
    pub fn new(fetcher: ArtifactFetcher) -> Self {
        Self::with_fs(fetcher, Arc::new(RealFileSystem))
    }

    pub fn with_fs(fetcher: ArtifactFetcher, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            cache: ArtifactCache::new(Arc::clone(&fs)),
            fetcher,
            fs,
        }
    }

    pub fn plan(&self, descriptor: &ArtifactDescriptor) -> InstallPlan {
        let state = self.cache.state(descriptor);
        InstallPlan::from_state(&state, descriptor.expected_version())
    }

    /// Execute a plan obtained from [`plan`](Self::plan).
    pub async fn apply(
        &self,
        descriptor: &ArtifactDescriptor,
        plan: InstallPlan,
    ) -> Result<InstallOutcome> {
        let version = descriptor.expected_version().to_string();
        let reason = match plan {
            InstallPlan::UpToDate => {
                debug!(version = %version, "artifact already cached");
                return Ok(InstallOutcome::AlreadyCached { version });
            }
            InstallPlan::Refresh(reason) => reason,
        };

        let url = descriptor.remote_location();
        info!(version = %version, url = %url, %reason, "refreshing cached artifact");
        self.fetcher.fetch(&url, descriptor.artifact_path()).await?;
        write_version_marker(self.fs.as_ref(), descriptor)?;

        info!(version = %version, "artifact installed");
        Ok(InstallOutcome::Installed { version, reason })
    }

    /// Plan and apply in one go.
    pub async fn install(&self, descriptor: &ArtifactDescriptor) -> Result<InstallOutcome> {
        let plan = self.plan(descriptor);
        self.apply(descriptor, plan).await
    }
}

/// Write the marker to a sibling temp file and rename it into place, so a
/// concurrent reader sees either the old marker or the complete new one.
pub fn write_version_marker(fs: &dyn FileSystem, descriptor: &ArtifactDescriptor) -> Result<()> {
    let marker = descriptor.version_marker_path();
    let tmp = temp_marker_path(descriptor);

    fs.write(&tmp, descriptor.expected_version().as_bytes())
        .with_context(|| format!("writing version marker {:?}", tmp))?;
    if let Err(e) = fs.rename(&tmp, marker) {
        if let Err(cleanup) = fs.remove_file(&tmp) {
            warn!(
                path = %tmp.display(),
                error = %cleanup,
                "failed to clean up temporary version marker"
            );
        }
        return Err(e.context(format!("installing version marker {:?}", marker)).into());
    }

    debug!(path = %marker.display(), version = %descriptor.expected_version(), "version marker written");
    Ok(())
}

fn temp_marker_path(descriptor: &ArtifactDescriptor) -> PathBuf {
    let name = format!(
        ".{}.{}.tmp",
        crate::cache::VERSION_MARKER_FILE_NAME,
        std::process::id()
    );
    descriptor.cache_dir().join(name)
}
