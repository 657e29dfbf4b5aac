//! Shared data models for the stampd watermarking service.
//!
//! This crate provides Serde-serializable types for:
//! - Watermark jobs and their lifecycle
//! - Upload media-kind validation

pub mod job;
pub mod media;

pub use job::{JobId, JobRecord, JobStatus};
pub use media::MediaKind;
