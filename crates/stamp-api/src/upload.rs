//! Upload persistence.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Save uploaded bytes under a fresh random name, keeping the original
/// extension, and return the saved path.
///
/// The random name keeps basenames unique, which the output-path derivation
/// (`watermarked_<basename>`) relies on.
pub async fn save_upload(
    dir: &Path,
    original_filename: &str,
    data: &[u8],
) -> std::io::Result<PathBuf> {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    let path = dir.join(format!("{}{}", Uuid::new_v4(), extension));
    tokio::fs::write(&path, data).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_saves_with_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_upload(dir.path(), "Holiday Clip.MP4", b"data").await.unwrap();

        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "mp4");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_extensionless_upload_gets_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_upload(dir.path(), "clip", b"data").await.unwrap();
        assert!(path.extension().is_none());
    }

    #[tokio::test]
    async fn test_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_upload(dir.path(), "clip.mp4", b"a").await.unwrap();
        let b = save_upload(dir.path(), "clip.mp4", b"b").await.unwrap();
        assert_ne!(a, b);
    }
}
