//! Loading input photos from disk.
use std::path::Path;

use ratings_shared::types::{UploadedImage, MIME_JPEG, MIME_PNG};
use tracing::debug;

use crate::errors::UploadError;

/// MIME type for a photo path, from its extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some(MIME_PNG),
        "jpg" | "jpeg" => Some(MIME_JPEG),
        _ => None,
    }
}

/// Read a PNG or JPEG file as generator input.
pub async fn load_upload(path: &Path) -> Result<UploadedImage, UploadError> {
    let mime_type =
        mime_type_for(path).ok_or_else(|| UploadError::UnsupportedFile(path.to_path_buf()))?;

    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), mime_type, "Loaded upload");
    Ok(UploadedImage::new(bytes, mime_type)?)
}
