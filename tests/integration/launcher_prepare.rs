// tests/integration/launcher_prepare.rs

use apex_ls_mcp::cache::ArtifactCache;
use apex_ls_mcp::errors::LauncherError;
use apex_ls_mcp::launcher::prepare;
use apex_ls_mcp::probe::VersionProbe;
use apex_ls_mcp_test_utils::builders::DescriptorBuilder;
use apex_ls_mcp_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

#[tokio::test]
async fn runtime_is_checked_before_cache() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let descriptor = DescriptorBuilder::new(dir.path()).build();
    let probe = VersionProbe::new("definitely-not-a-java-binary-7f3a", 17);

    let err = with_timeout(prepare(&probe, &ArtifactCache::default(), &descriptor))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::RuntimeMissing { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_runtime_at_launch_names_the_configured_minimum() {
    use apex_ls_mcp::launcher::launch;
    use apex_ls_mcp::supervise::Supervisor;
    use apex_ls_mcp_test_utils::fake_child::{FakeLauncher, ScriptedSignals};

    init_tracing();
    let dir = TempDir::new().unwrap();
    let descriptor = DescriptorBuilder::new(dir.path()).build();
    let (launcher, _control) = FakeLauncher::failing(std::io::ErrorKind::NotFound);
    let (signals, _tx) = ScriptedSignals::new();
    let mut supervisor = Supervisor::new(launcher, signals);
    let probe = VersionProbe::new("java", 21);

    let err = with_timeout(launch(&mut supervisor, &probe, &descriptor, &[]))
        .await
        .unwrap_err();

    assert!(err.is_executable_not_found());
    assert!(err.hint().unwrap().contains("Java 21+"));
}

#[cfg(unix)]
mod with_runtime {
    use std::ffi::OsString;

    use apex_ls_mcp::launcher::launch;
    use apex_ls_mcp::supervise::{CommandLauncher, Supervisor, Termination};
    use apex_ls_mcp_test_utils::builders::fake_jar;
    use apex_ls_mcp_test_utils::fake_child::{FakeLauncher, OnSignal, ScriptedSignals};

    use super::*;
    use crate::fake_java;

    const JAVA_17: &str = r#"if [ "$1" = "-version" ]; then
  echo 'openjdk version "17.0.9" 2023-10-17' >&2
  exit 0
fi
exit 7"#;

    #[tokio::test]
    async fn empty_cache_is_unusable_with_install_hint() {
        init_tracing();
        let bin = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let java = fake_java(bin.path(), JAVA_17);
        let descriptor = DescriptorBuilder::new(cache_dir.path()).version("4.2.0").build();

        let err = with_timeout(prepare(
            &VersionProbe::new(java.to_string_lossy(), 17),
            &ArtifactCache::default(),
            &descriptor,
        ))
        .await
        .unwrap_err();

        match &err {
            LauncherError::CacheUnusable { expected } => assert_eq!(expected, "4.2.0"),
            other => panic!("expected CacheUnusable, got {other:?}"),
        }
        assert_eq!(err.hint().as_deref(), Some("Please run: apex-ls-mcp-install"));
    }

    #[tokio::test]
    async fn ready_cache_launches_with_jar_and_passthrough_args() {
        init_tracing();
        let bin = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let java = fake_java(bin.path(), JAVA_17);
        let descriptor = DescriptorBuilder::new(cache_dir.path()).build();
        std::fs::write(descriptor.artifact_path(), fake_jar(b"engine")).unwrap();
        std::fs::write(descriptor.version_marker_path(), "1.0.0").unwrap();

        let java = java.to_string_lossy().into_owned();
        let probe = VersionProbe::new(java.as_str(), 17);
        with_timeout(prepare(&probe, &ArtifactCache::default(), &descriptor))
            .await
            .unwrap();

        let (launcher, control) = FakeLauncher::new(OnSignal::Ignore);
        let (signals, _tx) = ScriptedSignals::new();
        control.exit(apex_ls_mcp::supervise::ChildStatus::exited(0));
        let mut supervisor = Supervisor::new(launcher, signals);
        let passthrough = vec![OsString::from("--stdio"), OsString::from("a b")];

        let termination = with_timeout(launch(&mut supervisor, &probe, &descriptor, &passthrough))
            .await
            .unwrap();

        assert_eq!(termination, Termination::Code(0));
        let (program, args) = control.launched().remove(0);
        assert_eq!(program, OsString::from(&java));
        assert_eq!(
            args,
            vec![
                OsString::from("-jar"),
                descriptor.artifact_path().as_os_str().to_owned(),
                OsString::from("--stdio"),
                OsString::from("a b"),
            ]
        );
    }

    #[tokio::test]
    async fn real_child_exit_code_reaches_the_launcher() {
        init_tracing();
        let bin = TempDir::new().unwrap();
        let java = fake_java(bin.path(), JAVA_17);
        let descriptor = DescriptorBuilder::new(bin.path()).build();
        let (signals, _tx) = ScriptedSignals::new();
        let mut supervisor = Supervisor::new(CommandLauncher, signals);

        let probe = VersionProbe::new(java.to_string_lossy(), 17);
        let termination = with_timeout(launch(&mut supervisor, &probe, &descriptor, &[]))
            .await
            .unwrap();

        assert_eq!(termination, Termination::Code(7));
    }
}
