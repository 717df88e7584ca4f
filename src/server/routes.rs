//! Request handlers

use crate::extractor::validator::{validate, SUPPORTED_FORMATS};
use crate::extractor::VideoResult;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::FbloaderError;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
struct DownloadRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    success: bool,
    data: VideoResult,
}

/// `POST /api/download`
pub async fn download(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DownloadResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    handle_download(state, body)
        .instrument(info_span!("download", %request_id))
        .await
}

/// The body is parsed by hand so that an empty or malformed body is a 400
/// with the usual error shape rather than a framework rejection.
async fn handle_download(
    state: AppState,
    body: Bytes,
) -> Result<Json<DownloadResponse>, ApiError> {
    let request: DownloadRequest = serde_json::from_slice(&body).unwrap_or_default();
    let raw = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(FbloaderError::MissingUrl)?;

    let canonical = validate(&raw)?;
    info!("Processing URL: {}", canonical);

    let extractor = Arc::clone(&state.extractor);
    let url = canonical.into_string();
    let resolved = tokio::spawn(async move { extractor.resolve(&url).await }.in_current_span())
        .await
        .map_err(|e| FbloaderError::Internal(e.to_string()))?;

    match resolved {
        Some(data) => Ok(Json(DownloadResponse {
            success: true,
            data,
        })),
        None => Err(ApiError::not_found(
            "Could not find a downloadable video at that URL",
        )),
    }
}

/// Any method other than POST/OPTIONS on the download endpoint
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// `GET /api/info`
pub async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "Facebook Video Downloader",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "endpoints": {
            "download": "/api/download",
            "info": "/api/info",
        },
        "usage": {
            "method": "POST",
            "body": { "url": "facebook_video_url" },
        },
        "supportedFormats": SUPPORTED_FORMATS,
        "stages": state.extractor.stage_ids(),
        "fallbackEnabled": !state.settings.strict,
    }))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
