//! Job status polling and artifact download handlers.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use stamp_models::{JobId, JobStatus};

use crate::error::{ApiError, ApiResult};
use crate::files::{content_type_for, stream_file};
use crate::state::AppState;

/// Status snapshot returned to pollers.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// `GET /status/{task_id}` — read-only job snapshot.
pub async fn get_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let record = state
        .jobs
        .get(&JobId::from_string(task_id))
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    let download_url = (record.status == JobStatus::Completed)
        .then(|| format!("/download/{}", record.id));

    Ok(Json(StatusResponse {
        status: record.status,
        progress: record.progress,
        error: record.error,
        download_url,
    }))
}

/// `GET /download/{task_id}` — stream the finished artifact.
pub async fn download(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Response> {
    let record = state
        .jobs
        .get(&JobId::from_string(task_id))
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    if record.status != JobStatus::Completed {
        return Err(ApiError::bad_request("File not ready"));
    }

    // Completed records always carry an output path
    let output_path = record
        .output_path
        .as_ref()
        .ok_or_else(|| ApiError::internal("completed job has no output path"))?;

    stream_file(
        output_path,
        content_type_for(output_path),
        &record.download_filename(),
    )
    .await
}
