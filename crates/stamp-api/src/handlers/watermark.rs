//! Watermark submission handlers.
//!
//! Images are processed synchronously and streamed back; videos create a job
//! record, spawn a detached processing task, and return the job id
//! immediately.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use stamp_jobs::run_watermark_job;
use stamp_media::{watermark_image_command, FfmpegRunner};
use stamp_models::{JobId, JobRecord, MediaKind};

use crate::error::{ApiError, ApiResult};
use crate::files::{content_type_for, stream_file};
use crate::state::AppState;
use crate::upload::save_upload;

/// Parsed multipart watermark request.
struct WatermarkForm {
    data: Bytes,
    filename: String,
    content_type: Option<String>,
    watermark_text: String,
    moving_watermark: bool,
}

impl WatermarkForm {
    /// Collect the expected fields from a multipart stream.
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut file: Option<(Bytes, String, Option<String>)> = None;
        let mut watermark_text: Option<String> = None;
        let mut moving_watermark = false;

        while let Some(field) = multipart.next_field().await? {
            match field.name() {
                Some("file") => {
                    let filename = field
                        .file_name()
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "upload".to_string());
                    let content_type = field.content_type().map(|c| c.to_string());
                    let data = field.bytes().await?;
                    file = Some((data, filename, content_type));
                }
                Some("watermark_text") => {
                    watermark_text = Some(field.text().await?);
                }
                Some("moving_watermark") => {
                    moving_watermark = parse_bool(&field.text().await?);
                }
                _ => {}
            }
        }

        let (data, filename, content_type) =
            file.ok_or_else(|| ApiError::bad_request("Missing file field"))?;
        let watermark_text =
            watermark_text.ok_or_else(|| ApiError::bad_request("Missing watermark_text field"))?;

        Ok(Self {
            data,
            filename,
            content_type,
            watermark_text,
            moving_watermark,
        })
    }

    /// Reject uploads that are not the expected media kind.
    fn validate(&self, kind: MediaKind) -> ApiResult<()> {
        if kind.accepts(self.content_type.as_deref(), &self.filename) {
            return Ok(());
        }
        let detail = match kind {
            MediaKind::Image => "File must be an image",
            MediaKind::Video => "File must be a video",
        };
        Err(ApiError::bad_request(detail))
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// `POST /watermark/image` — watermark an image and stream it back.
pub async fn watermark_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = WatermarkForm::from_multipart(multipart).await?;
    form.validate(MediaKind::Image)?;

    let input_path = save_upload(&state.config.upload_dir, &form.filename, &form.data).await?;

    let result = async {
        let (cmd, output_path) =
            watermark_image_command(&input_path, &form.watermark_text, &state.config.output_dir);
        FfmpegRunner::new().run(&cmd).await?;

        stream_file(
            &output_path,
            form.content_type
                .as_deref()
                .unwrap_or_else(|| content_type_for(&output_path)),
            &format!("watermarked_{}", form.filename),
        )
        .await
    }
    .await;

    // The upload is no longer needed whether or not watermarking succeeded
    if let Err(e) = tokio::fs::remove_file(&input_path).await {
        warn!(path = %input_path.display(), error = %e, "failed to remove uploaded input");
    }

    result
}

/// Response for a video submission.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub task_id: JobId,
    pub status_url: String,
}

/// `POST /watermark/video` — create a job and schedule processing.
///
/// Returns immediately; progress is observable via `GET /status/{task_id}`.
pub async fn watermark_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<SubmitResponse>> {
    let form = WatermarkForm::from_multipart(multipart).await?;
    form.validate(MediaKind::Video)?;

    let input_path = save_upload(&state.config.upload_dir, &form.filename, &form.data).await?;

    let record = JobRecord::new(&form.filename, form.moving_watermark);
    let task_id = state.jobs.insert(record);

    info!(
        task_id = %task_id,
        filename = %form.filename,
        moving = form.moving_watermark,
        "video watermark job submitted"
    );

    tokio::spawn(run_watermark_job(
        state.jobs.clone(),
        task_id.clone(),
        input_path,
        form.watermark_text,
        form.moving_watermark,
        state.config.output_dir.clone(),
    ));

    let status_url = format!("/status/{task_id}");
    Ok(Json(SubmitResponse { task_id, status_url }))
}
