//! HTTP API for the labelsnip service.
//!
//! Endpoints:
//! - Health monitoring
//! - Label crop upload

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::StaticConfig;
use crate::service::LabelCropService;

pub mod crop;
use crop::crop_label_handler;

/// Application state
pub struct AppState {
    pub service: Arc<LabelCropService>,
    pub start_time: Instant,
}

/// Build the API router
pub fn router(service: Arc<LabelCropService>, config: &StaticConfig) -> Router {
    let state = Arc::new(AppState {
        service,
        start_time: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Use the configured upload limit for the crop endpoint body
    let max_body_size = config.limits.max_upload_bytes as usize;

    let api_routes = Router::new().route(
        "/crop",
        post(crop_label_handler).layer(DefaultBodyLimit::max(max_body_size)),
    );

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Health ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
}
