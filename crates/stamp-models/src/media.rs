//! Upload media-kind validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Image extensions accepted for synchronous watermarking.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Video extensions accepted for asynchronous watermarking.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Kind of media an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Declared content-type prefix for this kind (`image/`, `video/`).
    fn content_type_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Whether an upload is acceptable for this kind.
    ///
    /// Accepts when the declared content type carries the right prefix OR the
    /// filename extension is on the allow-list, so clients with a generic
    /// `application/octet-stream` type still get through on extension alone.
    pub fn accepts(&self, content_type: Option<&str>, filename: &str) -> bool {
        if let Some(ct) = content_type {
            if ct.starts_with(self.content_type_prefix()) {
                return true;
            }
        }

        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let ext = e.to_ascii_lowercase();
                self.extensions().iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_by_content_type() {
        assert!(MediaKind::Video.accepts(Some("video/mp4"), "anything.bin"));
        assert!(MediaKind::Image.accepts(Some("image/png"), "anything.bin"));
    }

    #[test]
    fn test_accepts_by_extension() {
        assert!(MediaKind::Video.accepts(Some("application/octet-stream"), "clip.MKV"));
        assert!(MediaKind::Video.accepts(None, "clip.webm"));
        assert!(MediaKind::Image.accepts(None, "photo.jpeg"));
    }

    #[test]
    fn test_rejects_text_upload() {
        assert!(!MediaKind::Video.accepts(Some("text/plain"), "notes.txt"));
        assert!(!MediaKind::Image.accepts(Some("text/plain"), "notes.txt"));
    }

    #[test]
    fn test_rejects_wrong_kind() {
        assert!(!MediaKind::Image.accepts(Some("video/mp4"), "clip.mp4"));
        assert!(!MediaKind::Video.accepts(Some("image/png"), "photo.png"));
    }

    #[test]
    fn test_rejects_missing_extension() {
        assert!(!MediaKind::Video.accepts(None, "clip"));
    }
}
