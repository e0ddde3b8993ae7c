//! Local-only ratings ledger.
//!
//! Aggregates live in the local key-value store under
//! [`ratings_store::AGGREGATE_KEY`]. Every client keeps its own independent
//! counters in this mode; there is no cross-user reconciliation.
//!
//! The whole table is a single persisted document, so submissions are
//! serialized by one lock around the load-modify-save cycle.
use std::sync::Arc;

use async_trait::async_trait;
use ratings_shared::types::{Aggregate, Choice, Ratings};
use ratings_store::{KeyValueStore, AGGREGATE_BACKUP_KEY, AGGREGATE_KEY};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{ensure_effect_id, LedgerError, RatingLedger};

/// Ratings ledger persisted in a local key-value store.
pub struct LocalRatingLedger {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl LocalRatingLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Lenient read for snapshots: anything unreadable is an empty table.
    async fn load(&self) -> Ratings {
        let raw = match self.store.get(AGGREGATE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ratings::new(),
            Err(e) => {
                warn!(error = %e, key = AGGREGATE_KEY, "Failed to read ratings, treating as empty");
                return Ratings::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, key = AGGREGATE_KEY, "Failed to parse ratings, treating as empty");
            Ratings::new()
        })
    }

    /// Read for load-modify-save. A failed read aborts instead of letting the
    /// following write replace the table; a corrupt document is copied to
    /// [`AGGREGATE_BACKUP_KEY`] before it is replaced.
    async fn load_for_update(&self) -> Result<Ratings, LedgerError> {
        let Some(raw) = self.store.get(AGGREGATE_KEY).await? else {
            return Ok(Ratings::new());
        };

        match serde_json::from_str(&raw) {
            Ok(ratings) => Ok(ratings),
            Err(e) => {
                warn!(
                    error = %e,
                    key = AGGREGATE_KEY,
                    backup = AGGREGATE_BACKUP_KEY,
                    "Corrupt ratings document, backing it up and starting fresh"
                );
                self.store.set(AGGREGATE_BACKUP_KEY, &raw).await?;
                Ok(Ratings::new())
            }
        }
    }
}

#[async_trait]
impl RatingLedger for LocalRatingLedger {
    async fn fetch_all(&self) -> Result<Ratings, LedgerError> {
        Ok(self.load().await)
    }

    async fn submit_vote(
        &self,
        effect_id: &str,
        new_choice: Choice,
        previous_choice: Option<Choice>,
    ) -> Result<Aggregate, LedgerError> {
        ensure_effect_id(effect_id)?;

        let _guard = self.write_lock.lock().await;

        let mut ratings = self.load_for_update().await?;
        let aggregate = {
            let aggregate = ratings.entry(effect_id.to_string()).or_default();
            aggregate.reconcile(new_choice, previous_choice);
            *aggregate
        };

        let raw = serde_json::to_string(&ratings)?;
        self.store.set(AGGREGATE_KEY, &raw).await?;

        info!(
            effect_id,
            new_choice = %new_choice,
            likes = aggregate.likes,
            dislikes = aggregate.dislikes,
            "Vote applied to local ratings"
        );
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratings_store::{MemoryKeyValueStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct ReadOnlyStore;

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    /// Memory store whose next `get` fails once when armed.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        fail_next_get: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_next_get.swap(false, Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk busy".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn test_counters_persist_across_instances() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());

        let ledger = LocalRatingLedger::new(kv.clone());
        ledger.submit_vote("vintage", Choice::Bad, None).await.unwrap();
        ledger
            .submit_vote("vintage", Choice::Good, Some(Choice::Bad))
            .await
            .unwrap();

        let reopened = LocalRatingLedger::new(kv);
        let ratings = reopened.fetch_all().await.unwrap();
        assert_eq!(ratings["vintage"], Aggregate::new(1, 0));
    }

    #[tokio::test]
    async fn test_persisted_document_format() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let ledger = LocalRatingLedger::new(kv.clone());
        ledger.submit_vote("vintage", Choice::Good, None).await.unwrap();

        let raw = kv.get(AGGREGATE_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"vintage":{"likes":1,"dislikes":0}}"#);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_backed_up_then_replaced() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(AGGREGATE_KEY, "{broken").await.unwrap();

        let ledger = LocalRatingLedger::new(kv.clone());
        assert!(ledger.fetch_all().await.unwrap().is_empty());
        let aggregate = ledger.submit_vote("vintage", Choice::Good, None).await.unwrap();
        assert_eq!(aggregate, Aggregate::new(1, 0));

        assert_eq!(
            kv.get(AGGREGATE_BACKUP_KEY).await.unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[tokio::test]
    async fn test_read_failure_during_vote_keeps_other_effects() {
        let kv = Arc::new(FlakyStore::default());
        let ledger = LocalRatingLedger::new(kv.clone());
        ledger.submit_vote("vintage", Choice::Good, None).await.unwrap();
        ledger.submit_vote("anime", Choice::Bad, None).await.unwrap();

        kv.fail_next_get.store(true, Ordering::SeqCst);
        let err = ledger.submit_vote("sketch", Choice::Good, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));

        let ratings = ledger.fetch_all().await.unwrap();
        assert_eq!(ratings["vintage"], Aggregate::new(1, 0));
        assert_eq!(ratings["anime"], Aggregate::new(0, 1));
        assert!(!ratings.contains_key("sketch"));

        // The next attempt goes through.
        let aggregate = ledger.submit_vote("sketch", Choice::Good, None).await.unwrap();
        assert_eq!(aggregate, Aggregate::new(1, 0));
        assert_eq!(ledger.fetch_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_write_failure_is_surfaced() {
        let ledger = LocalRatingLedger::new(Arc::new(ReadOnlyStore));
        let err = ledger.submit_vote("vintage", Choice::Good, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));
    }
}
