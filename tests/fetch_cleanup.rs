// tests/fetch_cleanup.rs

use std::path::Path;
use std::time::Duration;

use apex_ls_mcp::cache::ArtifactCache;
use apex_ls_mcp::errors::LauncherError;
use apex_ls_mcp::fetch::ArtifactFetcher;
use apex_ls_mcp_test_utils::builders::{DescriptorBuilder, fake_jar};
use apex_ls_mcp_test_utils::server::{
    ArtifactServer, RawStatusServer, SLOW_FIRST_CHUNK, SLOW_REST,
};
use apex_ls_mcp_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn successful_fetch_writes_exact_bytes() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let payload = fake_jar(b"engine-1.0.0");
    server.put("engine.jar", payload.clone());

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("nested").join("apex-ls-mcp.jar");
    let fetcher = ArtifactFetcher::new().unwrap();

    let written = with_timeout(fetcher.fetch(&server.url("/files/engine.jar"), &dest))
        .await
        .unwrap();

    assert_eq!(written, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), payload);
}

#[tokio::test]
async fn not_found_is_classified_and_leaves_nothing_behind() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");
    let url = server.url("/files/missing.jar");

    let err = with_timeout(ArtifactFetcher::new().unwrap().fetch(&url, &dest))
        .await
        .unwrap_err();

    match err {
        LauncherError::FetchNotFound { url: reported } => assert_eq!(reported, url),
        other => panic!("expected FetchNotFound, got {other:?}"),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn server_error_reports_status_and_keeps_previous_artifact() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");
    std::fs::write(&dest, fake_jar(b"old")).unwrap();

    let err = with_timeout(
        ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/status/500"), &dest),
    )
    .await
    .unwrap_err();

    match err {
        LauncherError::FetchRemoteError { status, status_text } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected FetchRemoteError, got {other:?}"),
    }
    assert_eq!(std::fs::read(&dest).unwrap(), fake_jar(b"old"));
    assert_eq!(entries(dir.path()), vec!["apex-ls-mcp.jar".to_string()]);
}

#[tokio::test]
async fn remote_error_keeps_the_servers_reason_phrase() {
    init_tracing();
    let server = RawStatusServer::start("503 Upstream Asleep").await;
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");

    let err = with_timeout(
        ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/apex-ls-mcp.jar"), &dest),
    )
    .await
    .unwrap_err();

    match err {
        LauncherError::FetchRemoteError { status, status_text } => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Upstream Asleep");
        }
        other => panic!("expected FetchRemoteError, got {other:?}"),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn empty_body_is_rejected() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");

    let err = with_timeout(ArtifactFetcher::new().unwrap().fetch(&server.url("/empty"), &dest))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::FetchEmptyPayload), "got {err:?}");
    assert!(!dest.exists());
    assert!(entries(dir.path()).is_empty());
}

#[tokio::test]
async fn interrupted_stream_removes_partial_file() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");

    let err = with_timeout(ArtifactFetcher::new().unwrap().fetch(&server.url("/broken"), &dest))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::FetchNetwork { .. }), "got {err:?}");
    assert!(!dest.exists());
    assert!(entries(dir.path()).is_empty());
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("apex-ls-mcp.jar");

    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/apex-ls-mcp.jar");

    let err = with_timeout(ArtifactFetcher::new().unwrap().fetch(&url, &dest))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::FetchNetwork { .. }), "got {err:?}");
    assert!(err.hint().unwrap().contains("internet connection"));
    assert!(!dest.exists());
}

#[tokio::test]
async fn refetch_in_progress_never_exposes_a_partial_artifact() {
    init_tracing();
    let server = ArtifactServer::start().await;
    let dir = TempDir::new().unwrap();
    let descriptor = DescriptorBuilder::new(dir.path()).version("1.0.0").build();
    let corrupted = b"<html>not a jar</html>".to_vec();
    std::fs::write(descriptor.artifact_path(), &corrupted).unwrap();
    std::fs::write(descriptor.version_marker_path(), "1.0.0").unwrap();

    let url = server.url("/slow");
    let dest = descriptor.artifact_path().to_path_buf();
    let download = tokio::spawn(async move {
        ArtifactFetcher::new().unwrap().fetch(&url, &dest).await
    });

    // Wait until the first chunk has landed in the staging file.
    with_timeout(async {
        loop {
            let staged = std::fs::read_dir(dir.path())
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                .any(|e| e.metadata().map(|m| m.len()).unwrap_or(0) >= SLOW_FIRST_CHUNK.len() as u64);
            if staged {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    let cache = ArtifactCache::default();
    assert!(!cache.is_usable(&descriptor));
    assert_eq!(std::fs::read(descriptor.artifact_path()).unwrap(), corrupted);

    server.release_slow();
    with_timeout(download).await.unwrap().unwrap();

    let mut expected = SLOW_FIRST_CHUNK.to_vec();
    expected.extend_from_slice(SLOW_REST);
    assert_eq!(std::fs::read(descriptor.artifact_path()).unwrap(), expected);
    assert!(cache.is_usable(&descriptor));
    assert_eq!(
        entries(dir.path()),
        vec!["apex-ls-mcp.jar".to_string(), "version.txt".to_string()]
    );
}
