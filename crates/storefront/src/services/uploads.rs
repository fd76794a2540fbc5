//! Image upload validation and storage.

use std::future::Future;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use thiserror::Error;
use uuid::Uuid;

/// Accepted image extensions (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Errors raised while accepting an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No image provided")]
    Missing,

    #[error("Invalid file type")]
    InvalidType,

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowercased extension of `filename` if it is an accepted image type.
#[must_use]
pub fn image_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// MIME type for an accepted extension.
#[must_use]
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components are dropped, whitespace becomes `_`, and anything other
/// than ASCII alphanumerics, `.`, `_` and `-` is removed. Leading dots are
/// stripped so the result is never hidden or a relative path.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Write an accepted image under `dir` with a unique name.
///
/// Returns the stored path.
///
/// # Errors
///
/// Returns `UploadError::InvalidType` for unaccepted extensions and
/// `UploadError::Io` if the file cannot be written.
pub async fn store_image(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
    if image_extension(filename).is_none() {
        return Err(UploadError::InvalidType);
    }

    tokio::fs::create_dir_all(dir).await?;

    let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(filename));
    let path = dir.join(stored_name);
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "Stored uploaded image");
    Ok(path)
}

/// An accepted image held in memory until the rest of its form is valid.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub filename: String,
    pub bytes: Bytes,
}

/// Store `image` under `dir`, then run `save` with the stored path.
///
/// The file is removed again when `save` fails, so a rejected write never
/// leaves an unreferenced upload behind.
///
/// # Errors
///
/// Returns the storage error converted into `E`, or `save`'s own error.
pub async fn save_with_image<T, E, F, Fut>(
    dir: &Path,
    image: Option<PendingImage>,
    save: F,
) -> Result<T, E>
where
    F: FnOnce(Option<PathBuf>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<UploadError>,
{
    let stored = match image {
        Some(image) => Some(store_image(dir, &image.filename, &image.bytes).await?),
        None => None,
    };

    let result = save(stored.clone()).await;
    if result.is_err()
        && let Some(path) = stored
        && let Err(e) = tokio::fs::remove_file(&path).await
    {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn neem() -> Option<PendingImage> {
        Some(PendingImage {
            filename: "neem.png".to_owned(),
            bytes: Bytes::from_static(b"png-bytes"),
        })
    }

    async fn files_in(dir: &Path) -> usize {
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }

    #[tokio::test]
    async fn test_failed_save_removes_stored_image() {
        let dir = std::env::temp_dir().join(format!("hg-uploads-{}", Uuid::new_v4()));

        let result: Result<(), UploadError> = save_with_image(&dir, neem(), |path| async move {
            assert!(path.unwrap().exists());
            Err(UploadError::Io(std::io::Error::other("insert failed")))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(files_in(&dir).await, 0);
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_successful_save_keeps_stored_image() {
        let dir = std::env::temp_dir().join(format!("hg-uploads-{}", Uuid::new_v4()));

        let saved = save_with_image(&dir, neem(), |path| async move {
            Ok::<_, UploadError>(path.unwrap())
        })
        .await
        .unwrap();

        assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"png-bytes");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_without_image_stores_nothing() {
        let dir = std::env::temp_dir().join(format!("hg-uploads-{}", Uuid::new_v4()));

        let saved = save_with_image(&dir, None, |path| async move { Ok::<_, UploadError>(path) })
            .await
            .unwrap();

        assert!(saved.is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("leaf.PNG").as_deref(), Some("png"));
        assert_eq!(image_extension("a.b.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(image_extension("leaf.svg"), None);
        assert_eq!(image_extension("png"), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\holy basil.jpg"), "holy_basil.jpg");
        assert_eq!(sanitize_filename("..hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("tulsi<script>.gif"), "tulsiscript.gif");
    }

    #[tokio::test]
    async fn test_store_image_writes_unique_file() {
        let dir = std::env::temp_dir().join(format!("hg-uploads-{}", Uuid::new_v4()));

        let first = store_image(&dir, "neem.jpg", b"jpg-bytes").await.unwrap();
        let second = store_image(&dir, "neem.jpg", b"other").await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(&dir));
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"jpg-bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_image_rejects_other_types() {
        let dir = std::env::temp_dir();
        let err = store_image(&dir, "payload.html", b"<html>").await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidType));
    }
}
