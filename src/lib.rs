// src/lib.rs

//! Launcher for the apex-ls-mcp analysis engine.
//!
//! - [`probe`] checks that a compatible Java runtime is on the path.
//! - [`cache`] decides whether the cached JAR can be launched.
//! - [`fetch`] and [`install`] refresh the cache.
//! - [`supervise`] runs `java -jar ...` and mirrors its exit on this process.

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exit_codes;
pub mod fetch;
pub mod fs;
pub mod install;
pub mod launcher;
pub mod logging;
pub mod probe;
pub mod supervise;

use tracing::debug;

use crate::cli::InstallArgs;
use crate::config::load_config;
use crate::errors::{LauncherError, Result};
use crate::fetch::ArtifactFetcher;
use crate::install::{InstallOutcome, InstallPlan, Installer, RefreshReason};

/// High-level entry point used by the installer binary.
///
/// Returns the process exit code; progress lines go to stdout.
pub async fn run_install(args: InstallArgs) -> Result<i32> {
    let cfg = load_config(args.config.as_deref())?;
    let descriptor = cfg.descriptor()?;
    let installer = Installer::new(ArtifactFetcher::new()?);
    let version = descriptor.expected_version();

    let plan = installer.plan(&descriptor);
    debug!(?plan, "install plan");

    if args.check {
        return Ok(match plan {
            InstallPlan::UpToDate => {
                println!("apex-ls-mcp v{version} is cached at {}", descriptor.artifact_path().display());
                exit_codes::OK
            }
            InstallPlan::Refresh(reason) => {
                println!("apex-ls-mcp v{version} is not usable: {reason}");
                exit_codes::FAILURE
            }
        });
    }

    println!("Installing apex-ls-mcp...");
    match &plan {
        InstallPlan::UpToDate => {}
        InstallPlan::Refresh(RefreshReason::Corrupted) => {
            println!("Cached JAR is corrupted, re-downloading...");
            println!("Downloading apex-ls-mcp v{version}...");
        }
        InstallPlan::Refresh(_) => println!("Downloading apex-ls-mcp v{version}..."),
    }

    match installer.apply(&descriptor, plan).await? {
        InstallOutcome::AlreadyCached { version } => {
            println!("apex-ls-mcp v{version} already cached");
        }
        InstallOutcome::Installed { version, .. } => {
            println!("apex-ls-mcp v{version} installed successfully");
        }
    }
    Ok(exit_codes::OK)
}

/// Print an error and its remediation hint the way both binaries do.
pub fn report_error(context: &str, err: &LauncherError) {
    eprintln!("{context}: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("{hint}");
    }
}
