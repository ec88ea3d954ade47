// tests/integration/probe_script.rs

use apex_ls_mcp::errors::LauncherError;
use apex_ls_mcp::probe::{NOT_FOUND_IN_PATH, UNPARSEABLE_VERSION, VersionProbe};
use apex_ls_mcp_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

use crate::fake_java;

#[tokio::test]
async fn modern_runtime_banner_on_stderr_is_parsed() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let java = fake_java(
        dir.path(),
        r#"echo 'openjdk version "21.0.2" 2024-01-16' >&2
echo 'OpenJDK Runtime Environment (build 21.0.2+13-58)' >&2"#,
    );

    let probe = VersionProbe::new(java.to_string_lossy(), 17);
    let info = with_timeout(probe.validate()).await.unwrap();

    assert_eq!(info.major_version, Some(21));
    assert_eq!(info.version.as_deref(), Some("21"));
    assert_eq!(info.full_version.as_deref(), Some("version \"21.0.2\""));
}

#[tokio::test]
async fn legacy_runtime_is_rejected_as_incompatible() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let java = fake_java(dir.path(), r#"echo 'java version "1.8.0_301"' >&2"#);

    let probe = VersionProbe::new(java.to_string_lossy(), 17);
    match with_timeout(probe.validate()).await {
        Err(LauncherError::IncompatibleRuntime { found, required }) => {
            assert_eq!(found, 8);
            assert_eq!(required, 17);
        }
        other => panic!("expected IncompatibleRuntime, got {other:?}"),
    }
}

#[tokio::test]
async fn banner_on_stdout_is_ignored() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let java = fake_java(dir.path(), r#"echo 'openjdk version "17.0.1"'"#);

    let info = with_timeout(VersionProbe::new(java.to_string_lossy(), 17).probe()).await;

    assert!(!info.available);
    assert_eq!(info.error.as_deref(), Some(UNPARSEABLE_VERSION));
}

#[tokio::test]
async fn failing_runtime_is_reported_missing() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let java = fake_java(
        dir.path(),
        r#"echo 'openjdk version "17.0.1"' >&2
exit 1"#,
    );

    let info = with_timeout(VersionProbe::new(java.to_string_lossy(), 17).probe()).await;

    assert!(!info.available);
    assert_eq!(info.error.as_deref(), Some(NOT_FOUND_IN_PATH));
}
