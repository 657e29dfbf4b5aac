//! File response helpers.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::path::Path;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::{ApiError, ApiResult};

/// Content type for an artifact, derived from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Stream a file back as an attachment download.
pub async fn stream_file(path: &Path, content_type: &str, filename: &str) -> ApiResult<Response> {
    let file = File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::not_found("File not found")
        } else {
            ApiError::Io(e)
        }
    })?;

    let content_length = file.metadata().await.ok().map(|m| m.len());

    // Quotes and control characters would corrupt the header value
    let safe_filename: String = filename
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{safe_filename}\""),
        );

    if let Some(len) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| ApiError::internal(format!("building response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_content_type_for_video_and_image() {
        assert_eq!(content_type_for(&PathBuf::from("a.mp4")), "video/mp4");
        assert_eq!(content_type_for(&PathBuf::from("a.WEBM")), "video/webm");
        assert_eq!(content_type_for(&PathBuf::from("a.png")), "image/png");
        assert_eq!(
            content_type_for(&PathBuf::from("a.xyz")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_stream_missing_file_is_not_found() {
        let err = stream_file(&PathBuf::from("/nonexistent/x.mp4"), "video/mp4", "x.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stream_sets_disposition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watermarked_clip.mp4");
        tokio::fs::write(&path, b"fake video bytes").await.unwrap();

        let response = stream_file(&path, "video/mp4", "watermarked_\"clip\".mp4")
            .await
            .unwrap();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(disposition, "attachment; filename=\"watermarked_clip.mp4\"");
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "16"
        );
    }
}
