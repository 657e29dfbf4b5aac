//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::progress::FfmpegProgress;

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to emit machine-readable progress on stdout
    report_progress: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    ///
    /// The output file is always overwritten if it exists.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            report_progress: false,
            log_level: "error".to_string(),
        }
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-codec:a").output_arg(codec)
    }

    /// Emit `key=value` progress lines on stdout (`-progress pipe:1`).
    pub fn with_progress(mut self) -> Self {
        self.report_progress = true;
        self
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Path the command writes its artifact to.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Overwrite any pre-existing output unconditionally
        args.push("-y".to_string());

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        if self.report_progress {
            args.push("-progress".to_string());
            args.push("pipe:1".to_string());
            args.push("-nostats".to_string());
        }

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with progress streaming.
#[derive(Debug, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }

    /// Run an FFmpeg command to completion, ignoring progress.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run an FFmpeg command, invoking the callback for each progress block.
    ///
    /// Progress lines are consumed from stdout while the process runs, so
    /// updates reach the callback before the process exits. Stderr is drained
    /// concurrently and surfaced in the error on non-zero exit.
    pub async fn run_with_progress<F>(
        &self,
        cmd: &FfmpegCommand,
        progress_callback: F,
    ) -> MediaResult<()>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().expect("stdout not captured");
        let mut stderr = child.stderr.take().expect("stderr not captured");

        // Consume progress blocks as they arrive
        let progress_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let mut current = FfmpegProgress::default();

            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(snapshot) = parse_progress_line(&line, &mut current) {
                    progress_callback(snapshot);
                }
            }
        });

        // Drain stderr so the process never blocks on a full pipe
        let stderr_handle = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let status = child.wait().await?;

        let _ = progress_handle.await;
        let stderr_text = stderr_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                status.code(),
                stderr_text.trim().to_string(),
            ))
        }
    }
}

/// Parse one line of FFmpeg's `-progress` output.
///
/// Folds `key=value` pairs into the running snapshot and returns a clone of
/// it once per block (on the `progress=` line). Malformed values are skipped
/// without touching the snapshot.
fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        match key {
            // Both keys carry microseconds; out_time_ms is misnamed upstream.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<i64>() {
                    current.out_time_us = us;
                }
            }
            "frame" => {
                if let Ok(frame) = value.parse() {
                    current.frame = frame;
                }
            }
            "fps" => {
                if let Ok(fps) = value.parse() {
                    current.fps = fps;
                }
            }
            "speed" => {
                // Format: "1.5x" or "N/A"
                if let Some(speed_str) = value.strip_suffix('x') {
                    if let Ok(speed) = speed_str.parse() {
                        current.speed = speed;
                    }
                }
            }
            "progress" => {
                // "continue" or "end"
                if value == "end" {
                    current.is_complete = true;
                }
                return Some(current.clone());
            }
            _ => {}
        }
    }

    None
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_args() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .video_filter("drawtext=text='hi'")
            .audio_codec("copy")
            .with_progress();

        let args = cmd.build_args();
        assert_eq!(args[0], "-y");
        assert!(args.contains(&"-progress".to_string()));
        assert!(args.contains(&"pipe:1".to_string()));
        assert!(args.contains(&"-codec:a".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp4");

        // Input comes before the output args
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        assert!(i_pos < vf_pos);
    }

    #[test]
    fn test_progress_disabled_by_default() {
        let args = FfmpegCommand::new("in.mp4", "out.mp4").build_args();
        assert!(!args.contains(&"-progress".to_string()));
    }

    #[test]
    fn test_progress_parsing() {
        let mut current = FfmpegProgress::default();

        assert!(parse_progress_line("out_time_ms=5000000", &mut current).is_none());
        assert_eq!(current.out_time_us, 5_000_000);

        parse_progress_line("speed=1.5x", &mut current);
        assert!((current.speed - 1.5).abs() < 0.01);

        let snapshot = parse_progress_line("progress=continue", &mut current).unwrap();
        assert!(!snapshot.is_complete);
        assert_eq!(snapshot.out_time_us, 5_000_000);

        let snapshot = parse_progress_line("progress=end", &mut current).unwrap();
        assert!(snapshot.is_complete);
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let mut current = FfmpegProgress {
            out_time_us: 1_000_000,
            ..Default::default()
        };

        parse_progress_line("out_time_ms=N/A", &mut current);
        assert_eq!(current.out_time_us, 1_000_000);

        parse_progress_line("out_time_ms=", &mut current);
        assert_eq!(current.out_time_us, 1_000_000);

        parse_progress_line("garbage line with no separator", &mut current);
        parse_progress_line("speed=N/A", &mut current);
        assert_eq!(current.out_time_us, 1_000_000);
    }
}
