// ─── HTTP surface ───
// JSON API for the mods page and stats widget, the archive download, and
// the static pages of the site.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::archive::{DownloadPayload, DownloadRequest, ARCHIVE_NAME};
use crate::core::catalog::ModsMap;
use crate::core::error::{SiteError, SiteResult};
use crate::core::state::AppState;
use crate::core::stats::StatsSnapshot;

const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Pages served by name, each backed by an HTML file in the public dir.
const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/seasons", "seasons.html"),
    ("/mods", "mods.html"),
    ("/map", "map.html"),
];

pub fn router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    let mut router = Router::new()
        .route("/api/mods-list", get(mods_list))
        .route("/api/download-mods", post(download_mods))
        .route("/api/stats", get(stats));

    for (path, file) in PAGES {
        router = router.route_service(path, ServeFile::new(public_dir.join(file)));
    }

    router
        .nest_service("/archive-map", ServeDir::new(&state.config.map_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Mods ────────────────────────────────────────────────

async fn mods_list(State(state): State<AppState>) -> SiteResult<Json<Arc<ModsMap>>> {
    Ok(Json(state.mods.get().await?))
}

async fn download_mods(
    State(state): State<AppState>,
    payload: Result<Json<DownloadPayload>, JsonRejection>,
) -> SiteResult<Response> {
    let Json(payload) = payload.map_err(|e| {
        SiteError::BadRequest(format!("Malformed download request: {}", e.body_text()))
    })?;
    let request = DownloadRequest::from_payload(payload)?;
    info!("Building archive of {} files", request.len());

    let stream = state.archiver.open(request).await?;
    Ok((
        [
            (header::CONTENT_TYPE, ARCHIVE_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ARCHIVE_NAME),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

// ── Stats ───────────────────────────────────────────────

async fn stats(State(state): State<AppState>) -> SiteResult<Json<Arc<StatsSnapshot>>> {
    Ok(Json(state.stats.get().await?))
}
