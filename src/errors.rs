// src/errors.rs

//! Crate-wide error type and remediation hints.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::MIN_JAVA_MAJOR;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Java is required but not available: {reason}\nPlease install Java {required} or higher.")]
    RuntimeMissing { reason: String, required: u32 },

    #[error(
        "Java {found} is installed, but Java {required} or higher is required.\nPlease upgrade your Java installation."
    )]
    IncompatibleRuntime { found: u32, required: u32 },

    #[error("apex-ls-mcp JAR not found or version mismatch (expected v{expected})")]
    CacheUnusable { expected: String },

    #[error("JAR file not found at {url}. Please check if the version exists.")]
    FetchNotFound { url: String },

    #[error("Failed to download: {status} {status_text}")]
    FetchRemoteError { status: u16, status_text: String },

    #[error("Downloaded file is empty")]
    FetchEmptyPayload,

    #[error("Network error while downloading {url}: {message}")]
    FetchNetwork { url: String, message: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    FetchFilesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    LaunchFailed {
        program: String,
        /// Minimum runtime major to name in the hint, when the caller knows it.
        required: Option<u32>,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LauncherError {
    /// One-line remediation to print after the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            LauncherError::CacheUnusable { .. } => {
                Some("Please run: apex-ls-mcp-install".to_string())
            }
            LauncherError::FetchNetwork { .. } => Some(
                "Network error. Please check your internet connection and try again.".to_string(),
            ),
            LauncherError::FetchFilesystem { source, .. } | LauncherError::IoError(source)
                if source.kind() == io::ErrorKind::PermissionDenied =>
            {
                Some(
                    "Permission denied. Please check file permissions for your home directory."
                        .to_string(),
                )
            }
            LauncherError::LaunchFailed {
                source, required, ..
            } if source.kind() == io::ErrorKind::NotFound => Some(format!(
                "Java not found. Please ensure Java {}+ is installed and in your PATH.",
                required.unwrap_or(MIN_JAVA_MAJOR)
            )),
            _ => None,
        }
    }

    /// Name `required` as the minimum runtime in a launch failure's hint.
    pub fn with_required_runtime(self, required: u32) -> Self {
        match self {
            LauncherError::LaunchFailed { program, source, .. } => LauncherError::LaunchFailed {
                program,
                required: Some(required),
                source,
            },
            other => other,
        }
    }

    /// True when the launch failed because the executable does not exist.
    pub fn is_executable_not_found(&self) -> bool {
        matches!(
            self,
            LauncherError::LaunchFailed { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LauncherError>;
