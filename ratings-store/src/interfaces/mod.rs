//! This module defines the `KeyValueStore` trait, the interface over the
//! local persisted storage that backs the vote store and local-only ledgers.
use async_trait::async_trait;

use crate::StoreError;

/// A durable string key-value store.
///
/// Implementors must have persisted a value by the time `set` returns `Ok`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
