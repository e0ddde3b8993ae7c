//! # Ratings Ledger
//! This crate provides the `RatingLedger` trait, the authoritative store of
//! per-effect like/dislike aggregates, together with its implementations:
//!
//! - [`InMemoryRatingLedger`]: process-local ledger with per-effect locking,
//!   used by the ledger service and in tests
//! - [`LocalRatingLedger`]: counters persisted in a local key-value store, for
//!   deployments without a remote ledger
//! - [`HttpRatingLedger`]: client for a remote ledger service
//!
//! [`LedgerSource`] picks one of them from configuration.
pub mod errors;
pub mod http;
pub mod interfaces;
mod locks;
pub mod local;
pub mod memory;
mod source;

pub use errors::LedgerError;
pub use http::HttpRatingLedger;
pub use interfaces::RatingLedger;
pub use local::LocalRatingLedger;
pub use memory::{InMemoryRatingLedger, SimulatedLatency};
pub use source::LedgerSource;

pub(crate) fn ensure_effect_id(effect_id: &str) -> Result<(), LedgerError> {
    if effect_id.trim().is_empty() {
        return Err(LedgerError::InvalidEffectId(effect_id.to_string()));
    }
    Ok(())
}
