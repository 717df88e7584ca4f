//! HTTP surface: download endpoint, info endpoint and the static client

pub mod assets;
pub mod error;
pub mod routes;

use crate::extractor::HybridExtractor;
use crate::utils::config::AppSettings;
use anyhow::{Context, Result};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Request headers browsers may send cross-origin
const ALLOWED_HEADERS: &[&str] = &[
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<HybridExtractor>,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Result<Self> {
        let extractor = HybridExtractor::from_settings(&settings)
            .context("Failed to build resolution pipeline")?;
        Ok(Self::with_extractor(settings, extractor))
    }

    pub fn with_extractor(settings: AppSettings, extractor: HybridExtractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
            settings: Arc::new(settings),
        }
    }
}

/// All origins, a fixed method list and a fixed header allow-list.
/// OPTIONS requests are answered here with 200 and an empty body.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(
            ALLOWED_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect::<Vec<_>>(),
        )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(assets::index))
        .route("/script.js", get(assets::script))
        .route("/style.css", get(assets::style))
        .route(
            "/api/download",
            post(routes::download).fallback(routes::method_not_allowed),
        )
        .route("/api/info", get(routes::info))
        .route("/api/health", get(routes::health))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn serve(settings: AppSettings) -> Result<()> {
    let addr = settings.bind_addr.clone();
    let state = AppState::new(settings)?;
    info!("Resolution stages: {:?}", state.extractor.stage_ids());

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
