use std::fmt;

use crate::SharedError;

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";

/// Image types accepted as generator input.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [MIME_PNG, MIME_JPEG];

/// A photo supplied by the user as generator input.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    /// Builds an upload, rejecting anything but PNG or JPEG.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, SharedError> {
        let mime_type = mime_type.into().to_lowercase();
        if !ACCEPTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(SharedError::UnsupportedMimeType(mime_type));
        }
        Ok(Self { bytes, mime_type })
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Image bytes returned by the generator.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Suggested download name, e.g. `vintage-result.jpg`.
    pub fn file_name(&self, effect_id: &str) -> String {
        let extension = match self.mime_type.as_str() {
            MIME_PNG => "png",
            _ => "jpg",
        };
        format!("{effect_id}-result.{extension}")
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
