//! FFmpeg progress parsing.

use serde::{Deserialize, Serialize};

/// Progress snapshot from FFmpeg's `-progress` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegProgress {
    /// Current frame number
    pub frame: u64,
    /// Current FPS
    pub fps: f64,
    /// Output time in microseconds.
    ///
    /// FFmpeg reports microseconds under both the `out_time_us` and the
    /// historically misnamed `out_time_ms` keys.
    pub out_time_us: i64,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete (`progress=end` seen)
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Elapsed output time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.out_time_us as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_seconds() {
        let progress = FfmpegProgress {
            out_time_us: 5_000_000,
            ..Default::default()
        };
        assert!((progress.elapsed_seconds() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_default_is_zero() {
        let progress = FfmpegProgress::default();
        assert_eq!(progress.out_time_us, 0);
        assert!(!progress.is_complete);
    }
}
