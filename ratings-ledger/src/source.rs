use std::path::PathBuf;
use std::sync::Arc;

use ratings_shared::types::Ratings;
use ratings_store::FileKeyValueStore;

use crate::{
    HttpRatingLedger, InMemoryRatingLedger, LocalRatingLedger, RatingLedger, SimulatedLatency,
};

/// Configuration for where aggregates live.
///
/// # Example
///
/// ```ignore
/// use ratings_ledger::LedgerSource;
///
/// // Tests and the ledger service itself
/// let ledger = LedgerSource::memory(base_ratings).into_ledger();
///
/// // Client talking to a deployed ledger service
/// let ledger = LedgerSource::remote("http://localhost:8787").into_ledger();
/// ```
#[derive(Debug, Clone)]
pub enum LedgerSource {
    /// Process-local ledger seeded with base ratings.
    Memory {
        seed: Ratings,
        latency: SimulatedLatency,
    },

    /// Counters persisted under a local data directory.
    Local { data_dir: PathBuf },

    /// A remote ledger service.
    Remote { base_url: String },
}

impl LedgerSource {
    pub fn memory(seed: Ratings) -> Self {
        Self::Memory {
            seed,
            latency: SimulatedLatency::none(),
        }
    }

    /// In-memory ledger that behaves like a slow remote one.
    pub fn simulated(seed: Ratings) -> Self {
        Self::Memory {
            seed,
            latency: SimulatedLatency::NETWORK,
        }
    }

    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self::Local {
            data_dir: data_dir.into(),
        }
    }

    pub fn remote(base_url: impl Into<String>) -> Self {
        Self::Remote {
            base_url: base_url.into(),
        }
    }

    /// Create the matching `RatingLedger` implementation.
    pub fn into_ledger(self) -> Arc<dyn RatingLedger> {
        match self {
            Self::Memory { seed, latency } => {
                Arc::new(InMemoryRatingLedger::with_ratings(seed).with_latency(latency))
            }
            Self::Local { data_dir } => Arc::new(LocalRatingLedger::new(Arc::new(
                FileKeyValueStore::new(data_dir),
            ))),
            Self::Remote { base_url } => Arc::new(HttpRatingLedger::new(&base_url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratings_shared::types::{Aggregate, Choice};

    #[tokio::test]
    async fn test_memory_source_keeps_seed() {
        let mut seed = Ratings::new();
        seed.insert("vintage".to_string(), Aggregate::new(5, 2));

        let ledger = LedgerSource::memory(seed).into_ledger();
        let aggregate = ledger.submit_vote("vintage", Choice::Bad, None).await.unwrap();
        assert_eq!(aggregate, Aggregate::new(5, 3));
    }
}
