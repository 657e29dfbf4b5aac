//! Axum HTTP API server for the stampd watermarking service.
//!
//! This crate provides:
//! - Multipart upload endpoints for image and video watermarking
//! - Job status polling and artifact download
//! - CORS, request logging and body-size limiting

pub mod config;
pub mod error;
pub mod files;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
