use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Default)]
struct ServerState {
    files: Mutex<HashMap<String, Vec<u8>>>,
    hits: AtomicUsize,
    slow_gate: Notify,
}

/// First chunk served by `/slow` before it waits for [`ArtifactServer::release_slow`].
pub const SLOW_FIRST_CHUNK: &[u8] = b"PK\x03\x04first-half";
/// Remainder served by `/slow` once released.
pub const SLOW_REST: &[u8] = b"-second-half";

/// Fake release host.
///
/// - `/files/{name}` serves whatever was registered with [`put`](Self::put), else 404;
/// - `/status/{code}` answers with that status and a short body;
/// - `/empty` answers 200 with no body;
/// - `/broken` sends a few bytes and then aborts the body stream;
/// - `/slow` sends [`SLOW_FIRST_CHUNK`], then holds the body open until
///   [`release_slow`](Self::release_slow) is called.
pub struct ArtifactServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    _handle: tokio::task::JoinHandle<()>,
}

impl ArtifactServer {
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let app = Router::new()
            .route("/files/{name}", get(serve_file))
            .route("/status/{code}", get(serve_status))
            .route("/empty", get(serve_empty))
            .route("/broken", get(serve_broken))
            .route("/slow", get(serve_slow))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Template resolving to `/files/apex-ls-mcp-<version>.jar`.
    pub fn url_template(&self) -> String {
        self.url("/files/apex-ls-mcp-{jarVersion}.jar")
    }

    /// Publish `bytes` as the JAR for `version`.
    pub fn put_version(&self, version: &str, bytes: Vec<u8>) {
        self.put(&format!("apex-ls-mcp-{version}.jar"), bytes);
    }

    pub fn put(&self, name: &str, bytes: Vec<u8>) {
        self.state
            .files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes);
    }

    /// Let `/slow` finish its body.
    pub fn release_slow(&self) {
        self.state.slow_gate.notify_one();
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

async fn serve_file(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.files.lock().unwrap().get(&name) {
        Some(bytes) => (StatusCode::OK, bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_status(State(state): State<Arc<ServerState>>, Path(code): Path<u16>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "fake failure").into_response()
}

async fn serve_empty(State(state): State<Arc<ServerState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Vec::<u8>::new()).into_response()
}

async fn serve_broken(State(state): State<Arc<ServerState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from_static(b"PK\x03\x04partial-archive")),
        Err(io::Error::other("connection dropped mid-stream")),
    ];
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap()
}

async fn serve_slow(State(state): State<Arc<ServerState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let first = futures::stream::once(async { Ok::<_, io::Error>(Bytes::from_static(SLOW_FIRST_CHUNK)) });
    let rest = futures::stream::once(async move {
        state.slow_gate.notified().await;
        Ok::<_, io::Error>(Bytes::from_static(SLOW_REST))
    });
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::from_stream(first.chain(rest)))
        .unwrap()
}

/// One-route HTTP/1.1 server answering every request with a fixed status line.
///
/// Used where the reason phrase must differ from the canonical one, which
/// the axum server above cannot express.
pub struct RawStatusServer {
    addr: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl RawStatusServer {
    /// `status_line` is e.g. `"503 Upstream Asleep"`.
    pub async fn start(status_line: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Self {
            addr,
            _handle: handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}
