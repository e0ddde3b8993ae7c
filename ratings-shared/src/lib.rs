//! # Ratings Shared
//! This crate defines the data structures shared by the ratings ledger, the
//! local vote store, the ledger service and the photo effects client.
//! It includes votes, per-effect aggregates, effect presets and image payloads.
pub mod errors;
pub mod types;

pub use errors::SharedError;
