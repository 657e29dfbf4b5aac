//! FFprobe duration probing.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Probe a media file for its container duration in seconds.
///
/// Duration only enables percentage-based progress reporting, so every
/// failure mode (ffprobe missing, non-zero exit, unparseable output) yields
/// `None` rather than an error and the caller degrades gracefully.
pub async fn probe_duration(path: impl AsRef<Path>) -> Option<f64> {
    let path = path.as_ref();

    if which::which("ffprobe").is_err() {
        debug!("ffprobe not found in PATH, skipping duration probe");
        return None;
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!(
            path = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "ffprobe exited with non-zero status"
        );
        return None;
    }

    parse_duration_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe's plain duration output into positive seconds.
fn parse_duration_output(stdout: &str) -> Option<f64> {
    let duration: f64 = stdout.trim().parse().ok()?;
    if duration.is_finite() && duration > 0.0 {
        Some(duration)
    } else {
        None
    }
}
