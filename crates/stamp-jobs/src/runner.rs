//! Background watermark job execution.
//!
//! One detached task per submitted video. The task probes the source
//! duration, launches ffmpeg, feeds parsed progress into the job store while
//! the process runs, finalizes the record on exit, and always removes the
//! uploaded input afterwards.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use stamp_media::{probe_duration, watermark_video_command, FfmpegRunner, MediaResult};
use stamp_models::JobId;

use crate::store::JobStore;

/// Progress floor set once the subprocess has been launched.
const STARTED_PROGRESS: u8 = 5;

/// Span of the progress range driven by the monitor (5..=95).
const MONITORED_SPAN: f64 = 90.0;

/// Map elapsed output time to a progress percentage in [5, 95].
///
/// `5 + min(90, floor(90 * elapsed / duration))`; the remaining 5% is only
/// granted when the process exits successfully. Monotonic in `elapsed`, so
/// pollers never observe a decreasing sequence.
pub fn progress_percent(elapsed: f64, duration: f64) -> u8 {
    if duration <= 0.0 {
        return STARTED_PROGRESS;
    }
    let scaled = (MONITORED_SPAN * elapsed / duration).floor();
    STARTED_PROGRESS + scaled.clamp(0.0, MONITORED_SPAN) as u8
}

/// Run one watermark job to a terminal state.
///
/// Never returns an error: every failure is recorded in the store so the job
/// is observable through polling, and the uploaded input file is removed on
/// every path.
pub async fn run_watermark_job(
    store: JobStore,
    job_id: JobId,
    input_path: PathBuf,
    watermark_text: String,
    moving: bool,
    output_dir: PathBuf,
) {
    match execute(&store, &job_id, &input_path, &watermark_text, moving, &output_dir).await {
        Ok(output_path) => {
            store.complete(&job_id, output_path);
            info!(job_id = %job_id, "watermark job completed");
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "watermark job failed");
            store.fail(&job_id, e.to_string());
        }
    }

    // The upload is owned by this job; remove it regardless of outcome.
    if let Err(e) = tokio::fs::remove_file(&input_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %input_path.display(), error = %e, "failed to remove uploaded input");
        }
    }
}

async fn execute(
    store: &JobStore,
    job_id: &JobId,
    input_path: &Path,
    watermark_text: &str,
    moving: bool,
    output_dir: &Path,
) -> MediaResult<PathBuf> {
    let (cmd, output_path) = watermark_video_command(input_path, watermark_text, moving, output_dir);

    let Some(duration) = probe_duration(input_path).await else {
        // No duration means no percentage basis: run one-shot and let the
        // record jump straight to 100 on success.
        debug!(job_id = %job_id, "duration unavailable, watermarking without progress reporting");
        FfmpegRunner::new().run(&cmd).await?;
        return Ok(output_path);
    };

    store.set_progress(job_id, STARTED_PROGRESS);

    let monitor_store = store.clone();
    let monitor_id = job_id.clone();
    FfmpegRunner::new()
        .run_with_progress(&cmd, move |progress| {
            let percent = progress_percent(progress.elapsed_seconds(), duration);
            monitor_store.set_progress(&monitor_id, percent);
        })
        .await?;

    Ok(output_path)
}
