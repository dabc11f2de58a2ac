//! In-process stand-ins for the services the site talks to.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const STATS_TOKEN: &str = "test-token";

/// Serve `app` on an ephemeral local port.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

/// A local address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

// ── File host ───────────────────────────────────────────

/// Serves `/files/{name}`; `missing.jar` answers 404. Counts requests.
#[derive(Clone, Default)]
pub struct FileHost {
    pub hits: Arc<AtomicUsize>,
}

impl FileHost {
    pub fn contents(name: &str) -> String {
        format!("contents of {}", name).repeat(64)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn spawn(&self) -> SocketAddr {
        async fn file(
            State(host): State<FileHost>,
            Path(name): Path<String>,
        ) -> Result<String, StatusCode> {
            host.hits.fetch_add(1, Ordering::SeqCst);
            match name.as_str() {
                "missing.jar" => Err(StatusCode::NOT_FOUND),
                other => Ok(FileHost::contents(other)),
            }
        }

        spawn_app(
            Router::new()
                .route("/files/:name", get(file))
                .with_state(self.clone()),
        )
        .await
    }
}

pub fn file_url(addr: SocketAddr, name: &str) -> String {
    format!("http://{}/files/{}", addr, name)
}

/// Answers every request with a `Content-Length` far beyond the body it
/// actually sends, then closes the connection.
pub async fn spawn_truncating_host() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Content-Type: application/java-archive\r\n\
                          Content-Length: 100000\r\n\r\n\
                          PARTIALDATA",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

// ── Stats plugin ────────────────────────────────────────

/// Serves `/stats` behind [`STATS_TOKEN`]. Each snapshot reports the hit
/// number as `online`; `down` makes it answer 502.
#[derive(Clone, Default)]
pub struct StatsPlugin {
    pub down: Arc<AtomicBool>,
    pub hits: Arc<AtomicUsize>,
}

impl StatsPlugin {
    pub fn snapshot(online: usize) -> Value {
        json!({ "online": online, "tps": 20.0, "whitelist": 12, "extra": { "motd": "paws" } })
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn spawn(&self) -> SocketAddr {
        async fn stats(
            State(plugin): State<StatsPlugin>,
            headers: HeaderMap,
        ) -> Result<Json<Value>, StatusCode> {
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(STATS_TOKEN) {
                return Err(StatusCode::UNAUTHORIZED);
            }
            if plugin.down.load(Ordering::SeqCst) {
                return Err(StatusCode::BAD_GATEWAY);
            }
            let hit = plugin.hits.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Json(StatsPlugin::snapshot(hit)))
        }

        spawn_app(
            Router::new()
                .route("/stats", get(stats))
                .with_state(self.clone()),
        )
        .await
    }
}
