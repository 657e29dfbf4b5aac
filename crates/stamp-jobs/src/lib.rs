//! Job tracking for asynchronous video watermarking.
//!
//! This crate provides:
//! - `JobStore`: a process-wide concurrent map of job records
//! - `run_watermark_job`: the detached per-job task that drives ffmpeg and
//!   feeds progress back into the store

pub mod runner;
pub mod store;

pub use runner::{progress_percent, run_watermark_job};
pub use store::JobStore;
