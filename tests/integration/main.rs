mod config_loading;
mod launcher_prepare;
#[cfg(unix)]
mod probe_script;

/// Write an executable `java` stand-in that runs `body` under `sh`.
#[cfg(unix)]
pub fn fake_java(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("java");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
