//! Error types for the ratings ledger.
//! Every ledger implementation reports failures through `LedgerError`, so
//! callers can handle an in-memory, local or remote ledger the same way.
use ratings_store::StoreError;
use thiserror::Error;

/// Represents errors that can occur while reading or updating a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid effect id: {0:?}")]
    InvalidEffectId(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ledger service returned {status}: {body}")]
    Status { status: u16, body: String },
}
