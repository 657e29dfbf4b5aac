//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("ffmpeg exited with code {exit_code}: {stderr}")]
    FfmpegFailed { exit_code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error from an exit status and captured stderr.
    ///
    /// An exit code of -1 means the process was terminated by a signal.
    pub fn ffmpeg_failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::FfmpegFailed {
            exit_code: exit_code.unwrap_or(-1),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_embeds_code_and_stderr() {
        let err = MediaError::ffmpeg_failed(Some(1), "No such file or directory");
        let msg = err.to_string();
        assert!(msg.contains("code 1"));
        assert!(msg.contains("No such file or directory"));
    }

    #[test]
    fn test_signal_exit_maps_to_minus_one() {
        let err = MediaError::ffmpeg_failed(None, "");
        assert!(err.to_string().contains("code -1"));
    }
}
