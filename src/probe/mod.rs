// src/probe/mod.rs

//! Java runtime discovery and compatibility check.
//!
//! [`VersionProbe::probe`] never fails: it always returns a
//! [`RuntimeVersionInfo`] describing what it found. Callers that just want to
//! fail fast use [`VersionProbe::validate`], which turns an unavailable or
//! too-old runtime into a [`LauncherError`] with remediation text.

pub mod parse;

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::MIN_JAVA_MAJOR;
use crate::errors::{LauncherError, Result};

pub use parse::{ParsedVersion, parse_java_version};

/// Error text for a runtime that exited non-zero on `-version`.
pub const NOT_FOUND_IN_PATH: &str = "Java not found in PATH";
/// Error text for output that carries no recognisable version.
pub const UNPARSEABLE_VERSION: &str = "Unable to parse Java version";

/// What the probe learned about the runtime. Built fresh on every probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeVersionInfo {
    pub available: bool,
    /// Leading version component as printed (`"1"` for Java 8).
    pub version: Option<String>,
    pub major_version: Option<u32>,
    pub is_compatible: Option<bool>,
    /// Full matched text, e.g. `version "17.0.1"`.
    pub full_version: Option<String>,
    pub error: Option<String>,
}

impl RuntimeVersionInfo {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Interpret the exit status and diagnostic text of `<java> -version`.
    pub fn from_output(exited_ok: bool, diagnostic: &str, min_major: u32) -> Self {
        if !exited_ok {
            return Self::unavailable(NOT_FOUND_IN_PATH);
        }
        match parse_java_version(diagnostic) {
            Some(parsed) => Self {
                available: true,
                version: Some(parsed.token),
                major_version: Some(parsed.major),
                is_compatible: Some(parsed.major >= min_major),
                full_version: Some(parsed.raw),
                error: None,
            },
            None => Self::unavailable(UNPARSEABLE_VERSION),
        }
    }
}

/// Runs `<java> -version` and judges the result against a minimum major version.
#[derive(Debug, Clone)]
pub struct VersionProbe {
    java: String,
    min_major: u32,
}

impl Default for VersionProbe {
    fn default() -> Self {
        Self::new("java", MIN_JAVA_MAJOR)
    }
}

impl VersionProbe {
    pub fn new(java: impl Into<String>, min_major: u32) -> Self {
        Self {
            java: java.into(),
            min_major,
        }
    }

    pub fn java(&self) -> &str {
        &self.java
    }

    pub fn min_major(&self) -> u32 {
        self.min_major
    }

    /// Run the runtime's self-report and describe it.
    ///
    /// The version banner goes to stderr; stdout is discarded.
    pub async fn probe(&self) -> RuntimeVersionInfo {
        debug!(java = %self.java, "probing java runtime");

        let output = Command::new(&self.java)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let info = match output {
            Ok(output) => {
                let diagnostic = String::from_utf8_lossy(&output.stderr);
                debug!(
                    exit_code = ?output.status.code(),
                    diagnostic = %diagnostic.trim(),
                    "java -version finished"
                );
                RuntimeVersionInfo::from_output(output.status.success(), &diagnostic, self.min_major)
            }
            Err(e) => {
                warn!(java = %self.java, error = %e, "failed to spawn java -version");
                RuntimeVersionInfo::unavailable(e.to_string())
            }
        };

        info!(
            available = info.available,
            major = ?info.major_version,
            compatible = ?info.is_compatible,
            "java runtime probed"
        );
        info
    }

    /// Probe, then fail with remediation text unless the runtime is usable.
    pub async fn validate(&self) -> Result<RuntimeVersionInfo> {
        let info = self.probe().await;
        self.judge(info)
    }

    /// The decision half of [`validate`](Self::validate), usable without a process.
    pub fn judge(&self, info: RuntimeVersionInfo) -> Result<RuntimeVersionInfo> {
        if !info.available {
            return Err(LauncherError::RuntimeMissing {
                reason: info.error.unwrap_or_else(|| NOT_FOUND_IN_PATH.to_string()),
                required: self.min_major,
            });
        }
        if info.is_compatible != Some(true) {
            return Err(LauncherError::IncompatibleRuntime {
                found: info.major_version.unwrap_or(0),
                required: self.min_major,
            });
        }
        Ok(info)
    }
}
