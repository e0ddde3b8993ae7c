//! Contract tests run against every in-process ledger implementation.

use std::sync::Arc;

use ratings_ledger::{InMemoryRatingLedger, LocalRatingLedger, RatingLedger};
use ratings_shared::types::{Aggregate, Choice, Ratings};
use ratings_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, AGGREGATE_KEY};

fn vintage_seed() -> Ratings {
    let mut seed = Ratings::new();
    seed.insert("vintage".to_string(), Aggregate::new(5, 2));
    seed
}

async fn seeded_local(store: Arc<dyn KeyValueStore>) -> LocalRatingLedger {
    store
        .set(AGGREGATE_KEY, &serde_json::to_string(&vintage_seed()).unwrap())
        .await
        .unwrap();
    LocalRatingLedger::new(store)
}

async fn ledgers() -> Vec<(&'static str, Box<dyn RatingLedger>, Option<tempfile::TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let file_store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(dir.path()));
    vec![
        (
            "memory",
            Box::new(InMemoryRatingLedger::with_ratings(vintage_seed())) as Box<dyn RatingLedger>,
            None,
        ),
        (
            "local-memory",
            Box::new(seeded_local(Arc::new(MemoryKeyValueStore::new())).await) as Box<dyn RatingLedger>,
            None,
        ),
        (
            "local-file",
            Box::new(seeded_local(file_store).await) as Box<dyn RatingLedger>,
            Some(dir),
        ),
    ]
}

#[tokio::test]
async fn test_vintage_vote_sequence() {
    for (name, ledger, _dir) in ledgers().await {
        let after_bad = ledger.submit_vote("vintage", Choice::Bad, None).await.unwrap();
        assert_eq!(after_bad, Aggregate::new(5, 3), "{name}");

        let after_good = ledger
            .submit_vote("vintage", Choice::Good, Some(Choice::Bad))
            .await
            .unwrap();
        assert_eq!(after_good, Aggregate::new(6, 2), "{name}");

        let ratings = ledger.fetch_all().await.unwrap();
        assert_eq!(ratings["vintage"], Aggregate::new(6, 2), "{name}");
    }
}

#[tokio::test]
async fn test_unknown_effect_starts_at_zero() {
    for (name, ledger, _dir) in ledgers().await {
        let aggregate = ledger.submit_vote("anime", Choice::Good, None).await.unwrap();
        assert_eq!(aggregate, Aggregate::new(1, 0), "{name}");

        let ratings = ledger.fetch_all().await.unwrap();
        assert_eq!(ratings["vintage"], Aggregate::new(5, 2), "{name}");
    }
}
