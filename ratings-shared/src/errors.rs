//! Error types for parsing and validating shared values.
use thiserror::Error;

/// Errors raised while building shared values from untrusted input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("Invalid image count: {0} (expected 1 or 2)")]
    InvalidImageCount(u8),

    #[error("Unsupported image type: {0}")]
    UnsupportedMimeType(String),
}
