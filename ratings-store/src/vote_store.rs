//! The local user's record of how they voted on each effect.
//!
//! Plain reads are never fatal: an unreadable or corrupt document is logged
//! and treated as "no votes", because the ratings ledger stays the authority
//! on aggregates. Recording a vote is stricter. A failed read aborts the
//! write so the other recorded votes are not replaced, and a corrupt document
//! is copied to [`VOTES_BACKUP_KEY`] before it is overwritten. Errors are
//! returned to the caller, which decides whether they matter.
use std::sync::Arc;

use ratings_shared::types::{Choice, UserVotes};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{KeyValueStore, StoreError, VOTES_BACKUP_KEY, VOTES_KEY};

/// Persists the local user's last choice per effect under [`VOTES_KEY`].
pub struct VoteStore {
    store: Arc<dyn KeyValueStore>,
    // Serializes the load-modify-save of the votes document.
    write_lock: Mutex<()>,
}

impl VoteStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns every recorded vote. Unreadable state yields an empty map.
    pub async fn votes(&self) -> UserVotes {
        let raw = match self.store.get(VOTES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return UserVotes::new(),
            Err(e) => {
                warn!(error = %e, key = VOTES_KEY, "Failed to read votes, treating as empty");
                return UserVotes::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, key = VOTES_KEY, "Failed to parse votes, treating as empty");
            UserVotes::new()
        })
    }

    /// Returns the last recorded choice for `effect_id`, if any.
    pub async fn get_vote(&self, effect_id: &str) -> Option<Choice> {
        self.votes().await.get(effect_id).copied()
    }

    /// Overwrites the stored choice for `effect_id`.
    ///
    /// Returns only once the new document is persisted.
    pub async fn record_vote(&self, effect_id: &str, choice: Choice) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut votes = self.load_for_update().await?;
        votes.insert(effect_id.to_string(), choice);

        let raw = serde_json::to_string(&votes)?;
        self.store.set(VOTES_KEY, &raw).await?;

        debug!(effect_id, %choice, "Recorded vote");
        Ok(())
    }

    async fn load_for_update(&self) -> Result<UserVotes, StoreError> {
        let Some(raw) = self.store.get(VOTES_KEY).await? else {
            return Ok(UserVotes::new());
        };

        match serde_json::from_str(&raw) {
            Ok(votes) => Ok(votes),
            Err(e) => {
                warn!(
                    error = %e,
                    key = VOTES_KEY,
                    backup = VOTES_BACKUP_KEY,
                    "Corrupt votes document, backing it up and starting fresh"
                );
                self.store.set(VOTES_BACKUP_KEY, &raw).await?;
                Ok(UserVotes::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKeyValueStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".to_string()))
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

    fn memory_vote_store() -> (Arc<MemoryKeyValueStore>, VoteStore) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let votes = VoteStore::new(kv.clone());
        (kv, votes)
    }

    #[tokio::test]
    async fn test_unvoted_effect_is_none() {
        let (_, votes) = memory_vote_store();
        assert_eq!(votes.get_vote("vintage").await, None);
    }

    #[tokio::test]
    async fn test_record_overwrites_previous_choice() {
        let (_, votes) = memory_vote_store();
        votes.record_vote("vintage", Choice::Bad).await.unwrap();
        votes.record_vote("vintage", Choice::Good).await.unwrap();
        votes.record_vote("anime", Choice::Bad).await.unwrap();

        assert_eq!(votes.get_vote("vintage").await, Some(Choice::Good));
        assert_eq!(votes.votes().await.len(), 2);
    }

    #[tokio::test]
    async fn test_persisted_document_format() {
        let (kv, votes) = memory_vote_store();
        votes.record_vote("vintage", Choice::Good).await.unwrap();
        assert_eq!(
            kv.get(VOTES_KEY).await.unwrap().as_deref(),
            Some(r#"{"vintage":"good"}"#)
        );
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_as_empty() {
        let (kv, votes) = memory_vote_store();
        kv.set(VOTES_KEY, "not json").await.unwrap();
        assert_eq!(votes.get_vote("vintage").await, None);
        assert!(votes.votes().await.is_empty());

        votes.record_vote("vintage", Choice::Good).await.unwrap();
        assert_eq!(votes.get_vote("vintage").await, Some(Choice::Good));
        assert_eq!(
            kv.get(VOTES_BACKUP_KEY).await.unwrap().as_deref(),
            Some("not json")
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_absent_and_write_failure_surfaces() {
        let votes = VoteStore::new(Arc::new(FailingStore));
        assert_eq!(votes.get_vote("vintage").await, None);

        let err = votes.record_vote("vintage", Choice::Good).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_read_failure_while_recording_keeps_other_votes() {
        let kv = Arc::new(FlakyStore::default());
        let votes = VoteStore::new(kv.clone());
        votes.record_vote("vintage", Choice::Good).await.unwrap();
        votes.record_vote("anime", Choice::Bad).await.unwrap();

        kv.fail_next_get.store(true, Ordering::SeqCst);
        let err = votes.record_vote("sketch", Choice::Good).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let recorded = votes.votes().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded["vintage"], Choice::Good);
        assert_eq!(recorded["anime"], Choice::Bad);
    }
}
