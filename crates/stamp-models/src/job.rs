//! Watermark job records for progress tracking and polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a watermark job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is actively being processed
    #[default]
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of one video watermarking request, from submission to terminal.
///
/// Created once by the submission handler, mutated only through the guarded
/// methods below, and read as snapshots by polling and download handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job identifier
    pub id: JobId,
    /// Current job status
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Path of the watermarked artifact, set when the job completes
    pub output_path: Option<PathBuf>,
    /// Filename the client uploaded, used to shape the download filename
    pub original_filename: String,
    /// Whether the watermark scrolls across the frame
    pub moving_watermark: bool,
    /// Error message if the job failed
    pub error: Option<String>,
    /// When the job was submitted
    pub created_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new record in the `Processing` state with a fresh id.
    pub fn new(original_filename: impl Into<String>, moving_watermark: bool) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Processing,
            progress: 0,
            output_path: None,
            original_filename: original_filename.into(),
            moving_watermark,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Update progress. Never decreases, never mutates a terminal record.
    pub fn set_progress(&mut self, progress: u8) {
        if self.is_terminal() || progress <= self.progress {
            return;
        }
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
    }

    /// Transition to `Completed`, pinning progress to 100.
    ///
    /// No-op if the record is already terminal.
    pub fn mark_completed(&mut self, output_path: PathBuf) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.output_path = Some(output_path);
        self.updated_at = Utc::now();
    }

    /// Transition to `Error`, leaving progress at its last observed value.
    ///
    /// No-op if the record is already terminal.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Error;
        self.error = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Filename to serve the artifact under, prefixed by watermark kind.
    pub fn download_filename(&self) -> String {
        let prefix = if self.moving_watermark { "moving_" } else { "" };
        format!("{}watermarked_{}", prefix, self.original_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(serde_json::to_string(&JobStatus::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut record = JobRecord::new("clip.mp4", false);
        record.set_progress(40);
        record.set_progress(20);
        assert_eq!(record.progress, 40);
        record.set_progress(55);
        assert_eq!(record.progress, 55);
    }

    #[test]
    fn test_completion_pins_progress() {
        let mut record = JobRecord::new("clip.mp4", false);
        record.set_progress(60);
        record.mark_completed(PathBuf::from("out/watermarked_clip.mp4"));
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 100);
        assert!(record.output_path.is_some());
    }

    #[test]
    fn test_failure_keeps_last_progress() {
        let mut record = JobRecord::new("clip.mp4", false);
        record.set_progress(35);
        record.mark_failed("ffmpeg exited with code 1");
        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(record.progress, 35);
        assert_eq!(record.error.as_deref(), Some("ffmpeg exited with code 1"));
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut record = JobRecord::new("clip.mp4", false);
        record.mark_completed(PathBuf::from("out/watermarked_clip.mp4"));
        record.mark_failed("late failure");
        assert_eq!(record.status, JobStatus::Completed);
        assert!(record.error.is_none());

        record.set_progress(10);
        assert_eq!(record.progress, 100);
    }

    #[test]
    fn test_download_filename_prefix() {
        let fixed = JobRecord::new("holiday.mp4", false);
        assert_eq!(fixed.download_filename(), "watermarked_holiday.mp4");

        let moving = JobRecord::new("holiday.mp4", true);
        assert_eq!(moving.download_filename(), "moving_watermarked_holiday.mp4");
    }
}
