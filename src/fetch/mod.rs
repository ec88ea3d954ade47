// src/fetch/mod.rs

//! Single-shot artifact download into the cache.
//!
//! One GET, no retries. The body is streamed into a hidden sibling file and
//! only renamed over the destination once it is complete and non-empty, so
//! the cache never sees a partial artifact. Whatever goes wrong, the staging
//! file is gone before the error leaves this module.

use std::io;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::errors::{LauncherError, Result};

/// Downloads a remote artifact to a local path.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: Client,
}

impl ArtifactFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("building HTTP client: {}", e))?;
        Ok(Self { client })
    }

    /// Download `url` to `destination`, returning the destination on success.
    ///
    /// `destination` is replaced in one rename. On failure it is left as it
    /// was and the staging file is removed before the error is returned.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        let staging = staging_path(destination);
        let result = match self.fetch_inner(url, &staging).await {
            Ok(bytes) => fs::rename(&staging, destination)
                .await
                .map(|()| bytes)
                .map_err(|e| fs_error(destination, e)),
            Err(err) => Err(err),
        };

        match result {
            Ok(bytes) => {
                info!(url = %url, path = %destination.display(), bytes, "artifact downloaded");
                Ok(destination.to_path_buf())
            }
            Err(err) => {
                warn!(url = %url, error = %err, "artifact download failed");
                remove_partial(&staging).await;
                Err(err)
            }
        }
    }

    async fn fetch_inner(&self, url: &str, staging: &Path) -> Result<u64> {
        debug!(url = %url, "requesting artifact");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LauncherError::FetchNotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LauncherError::FetchRemoteError {
                status: status.as_u16(),
                status_text: reason_phrase(&response),
            });
        }

        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| fs_error(parent, e))?;
        }

        let mut file = fs::File::create(staging)
            .await
            .map_err(|e| fs_error(staging, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| network_error(url, &e))?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| fs_error(staging, e))?;
        }
        file.flush().await.map_err(|e| fs_error(staging, e))?;
        file.sync_all().await.map_err(|e| fs_error(staging, e))?;
        drop(file);

        let written = fs::metadata(staging)
            .await
            .map_err(|e| fs_error(staging, e))?
            .len();
        if written == 0 {
            return Err(LauncherError::FetchEmptyPayload);
        }

        debug!(
            path = %staging.display(),
            bytes = written,
            digest = %hasher.finalize().to_hex(),
            "artifact written"
        );
        Ok(written)
    }
}

/// Hidden file next to `destination`, so the final rename stays on one filesystem.
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    destination.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// The reason phrase the server sent, or the canonical one for the status.
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_string()
}

async fn remove_partial(staging: &Path) {
    match fs::remove_file(staging).await {
        Ok(()) => debug!(path = %staging.display(), "removed partial download"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %staging.display(),
            error = %e,
            "failed to clean up partial download"
        ),
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> LauncherError {
    LauncherError::FetchNetwork {
        url: url.to_string(),
        message: error_chain(err),
    }
}

fn fs_error(path: &Path, source: io::Error) -> LauncherError {
    LauncherError::FetchFilesystem {
        path: path.to_path_buf(),
        source,
    }
}

/// `reqwest` errors keep the useful part (e.g. "connection refused") in their sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
