//! In-memory implementation of the ratings ledger.
//!
//! State is owned by the ledger instance; nothing is shared between
//! instances. Concurrency model:
//!
//! - submissions for one effect are serialized by a per-effect mutex, held
//!   across the simulated latency and the update
//! - the aggregate table sits behind a read/write lock and every
//!   reconciliation happens inside a single write-lock critical section, so
//!   `fetch_all` observes each vote either fully applied or not at all
//! - reads share the read lock and never block each other
use std::time::Duration;

use async_trait::async_trait;
use ratings_shared::types::{Aggregate, Choice, Ratings};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::locks::EffectLocks;
use crate::{ensure_effect_id, LedgerError, RatingLedger};

/// Artificial delays applied before each ledger operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub fetch: Duration,
    pub submit: Duration,
}

impl SimulatedLatency {
    /// Round-trip times of a typical remote ledger.
    pub const NETWORK: SimulatedLatency = SimulatedLatency {
        fetch: Duration::from_millis(500),
        submit: Duration::from_millis(750),
    };

    pub fn none() -> Self {
        Self::default()
    }
}

/// Ratings ledger held entirely in process memory.
#[derive(Default)]
pub struct InMemoryRatingLedger {
    ratings: RwLock<Ratings>,
    locks: EffectLocks,
    latency: SimulatedLatency,
}

impl InMemoryRatingLedger {
    /// Creates an empty ledger with no artificial latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger seeded with base ratings.
    pub fn with_ratings(seed: Ratings) -> Self {
        Self {
            ratings: RwLock::new(seed),
            ..Self::default()
        }
    }

    /// Delays every operation by the given latency.
    pub fn with_latency(mut self, latency: SimulatedLatency) -> Self {
        self.latency = latency;
        self
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

#[async_trait]
impl RatingLedger for InMemoryRatingLedger {
    async fn fetch_all(&self) -> Result<Ratings, LedgerError> {
        simulate(self.latency.fetch).await;

        let snapshot = self.ratings.read().await.clone();
        debug!(effects = snapshot.len(), "Fetched ratings snapshot");
        Ok(snapshot)
    }

    async fn submit_vote(
        &self,
        effect_id: &str,
        new_choice: Choice,
        previous_choice: Option<Choice>,
    ) -> Result<Aggregate, LedgerError> {
        ensure_effect_id(effect_id)?;

        let _effect_guard = self.locks.lock(effect_id).await;
        simulate(self.latency.submit).await;

        let aggregate = {
            let mut ratings = self.ratings.write().await;
            let aggregate = ratings.entry(effect_id.to_string()).or_default();
            aggregate.reconcile(new_choice, previous_choice);
            *aggregate
        };

        info!(
            effect_id,
            new_choice = %new_choice,
            previous_choice = ?previous_choice,
            likes = aggregate.likes,
            dislikes = aggregate.dislikes,
            "Vote applied"
        );
        Ok(aggregate)
    }
}
