use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Central error type for the site backend.
/// Every module returns `Result<T, SiteError>`.
#[derive(Debug, Error)]
pub enum SiteError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream {url} answered HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip encoding error: {0}")]
    Zip(#[from] async_zip::error::ZipError),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },

    #[error("Failed to fetch mods data: {0}")]
    Catalog(String),

    // ── Requests ────────────────────────────────────────
    #[error("{0}")]
    BadRequest(String),

    #[error("Minecraft Server API unavailable")]
    StatsUnavailable,
}

/// Convenience alias used throughout the crate.
pub type SiteResult<T> = Result<T, SiteError>;

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SiteError::StatsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ── HTTP responses ──────────────────────────────────────
// Client errors go out as plain text, everything else as `{"error": ...}`.
impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            SiteError::BadRequest(message) => (status, message).into_response(),
            other => (
                status,
                Json(serde_json::json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}
