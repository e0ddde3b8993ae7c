//! This module defines the `RatingLedger` trait, the interface to the
//! authoritative like/dislike aggregates.
use async_trait::async_trait;
use ratings_shared::types::{Aggregate, Choice, Ratings};

use crate::LedgerError;

/// A trait that defines the interface to a ratings ledger.
///
/// Implementors must apply each `submit_vote` as one atomic unit with respect
/// to every other read or write of the same effect.
#[async_trait]
pub trait RatingLedger: Send + Sync {
    /// Returns an owned point-in-time snapshot of every aggregate.
    ///
    /// Mutating the returned map never affects the ledger.
    async fn fetch_all(&self) -> Result<Ratings, LedgerError>;

    /// Applies a vote and returns the effect's updated aggregate.
    ///
    /// A missing aggregate starts at `(0, 0)`. When `previous_choice` is set,
    /// its counter is decremented (floored at zero) before the counter for
    /// `new_choice` is incremented.
    ///
    /// Callers are expected to skip this call entirely when `new_choice`
    /// equals `previous_choice`.
    async fn submit_vote(
        &self,
        effect_id: &str,
        new_choice: Choice,
        previous_choice: Option<Choice>,
    ) -> Result<Aggregate, LedgerError>;
}
