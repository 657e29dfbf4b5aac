//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{download, get_status, health, watermark_image, watermark_video};
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/watermark/image", post(watermark_image))
        .route("/watermark/video", post(watermark_video))
        .route("/status/:task_id", get(get_status))
        .route("/download/:task_id", get(download))
        .route("/health", get(health))
        // axum's built-in multipart cap is 2MB; uploads are bounded by config
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
