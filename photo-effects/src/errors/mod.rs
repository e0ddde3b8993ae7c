//! Error types for the photo effects client.
//! Each component has its own error enum; `AppError` consolidates them for
//! the command line entry point.
use std::path::PathBuf;

use image_generation::GenerationError;
use ratings_ledger::LedgerError;
use ratings_shared::SharedError;
use thiserror::Error;

/// Errors from the vote flow.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("A vote is already being submitted")]
    VoteInProgress,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Errors from a generation session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A generation request is already in flight")]
    InFlight,

    #[error("Effect needs {required} image(s), {provided} uploaded")]
    MissingImages { required: usize, provided: usize },

    #[error("Effect accepts {allowed} image(s), {provided} uploaded")]
    TooManyImages { allowed: usize, provided: usize },

    #[error("Nothing to retry")]
    NothingToRetry,

    #[error("{}: {}", .0.code(), .0)]
    Generation(#[from] GenerationError),
}

/// Errors while loading the effect catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse effects: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate effect id: {0}")]
    DuplicateId(String),

    #[error("Catalog has no effects")]
    Empty,
}

/// Errors while reading an input photo.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image file {0} (expected .png, .jpg or .jpeg)")]
    UnsupportedFile(PathBuf),

    #[error(transparent)]
    Invalid(#[from] SharedError),
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level error for the command line application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("Generation error: {0}")]
    Session(#[from] SessionError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
