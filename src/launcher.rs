// src/launcher.rs

//! The launcher flow: probe the runtime, check the cache, supervise the child.

use std::ffi::{OsStr, OsString};

use tracing::{debug, info};

use crate::cache::{ArtifactCache, ArtifactDescriptor};
use crate::config::LauncherConfig;
use crate::errors::{LauncherError, Result};
use crate::probe::VersionProbe;
use crate::supervise::{CommandLauncher, Launcher, OsSignals, SignalSource, Supervisor, Termination};

/// Build `-jar <artifact> <passthrough...>` without touching the pass-through bytes.
pub fn runtime_args(descriptor: &ArtifactDescriptor, passthrough: &[OsString]) -> Vec<OsString> {
    let mut args = Vec::with_capacity(passthrough.len() + 2);
    args.push(OsString::from("-jar"));
    args.push(descriptor.artifact_path().as_os_str().to_owned());
    args.extend(passthrough.iter().cloned());
    args
}

/// Production entry point: real probe, real cache, real child and OS signals.
///
/// Ends the process with the child's exit once the runtime has started, so
/// it only returns when something failed before or during launch.
pub async fn run_launcher(config: &LauncherConfig, passthrough: Vec<OsString>) -> LauncherError {
    let descriptor = match config.descriptor() {
        Ok(descriptor) => descriptor,
        Err(err) => return err,
    };
    let probe = VersionProbe::new(config.java(), config.min_java_major());
    if let Err(err) = prepare(&probe, &ArtifactCache::default(), &descriptor).await {
        return err;
    }

    let signals = match OsSignals::install() {
        Ok(signals) => signals,
        Err(err) => return err.into(),
    };
    let mut supervisor = Supervisor::new(CommandLauncher, signals);
    let args = runtime_args(&descriptor, &passthrough);
    log_launch(config.java(), &descriptor, &passthrough);
    supervisor
        .run(OsStr::new(config.java()), &args)
        .await
        .with_required_runtime(config.min_java_major())
}

/// Fail fast unless the runtime is compatible and the cache is usable, in that order.
pub async fn prepare(
    probe: &VersionProbe,
    cache: &ArtifactCache,
    descriptor: &ArtifactDescriptor,
) -> Result<()> {
    let info = probe.validate().await?;
    debug!(major = ?info.major_version, "java runtime accepted");

    if !cache.is_usable(descriptor) {
        return Err(LauncherError::CacheUnusable {
            expected: descriptor.expected_version().to_string(),
        });
    }
    Ok(())
}

/// Run `<java> -jar <artifact> <passthrough...>` under `supervisor`, using
/// the runtime `probe` accepted.
pub async fn launch<L: Launcher, S: SignalSource>(
    supervisor: &mut Supervisor<L, S>,
    probe: &VersionProbe,
    descriptor: &ArtifactDescriptor,
    passthrough: &[OsString],
) -> Result<Termination> {
    let args = runtime_args(descriptor, passthrough);
    log_launch(probe.java(), descriptor, passthrough);
    supervisor
        .supervise(OsStr::new(probe.java()), &args)
        .await
        .map_err(|err| err.with_required_runtime(probe.min_major()))
}

fn log_launch(java: &str, descriptor: &ArtifactDescriptor, passthrough: &[OsString]) {
    info!(
        java = %java,
        jar = %descriptor.artifact_path().display(),
        passthrough = passthrough.len(),
        "starting analysis engine"
    );
}
