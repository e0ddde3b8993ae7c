//! # Ratings Store
//! This crate provides the local key-value persistence used by the photo
//! effects client. It includes the `KeyValueStore` abstraction with a
//! file-backed and an in-memory implementation, and the `VoteStore` which
//! remembers how the local user voted on each effect.
pub mod errors;
pub mod file;
pub mod interfaces;
pub mod memory;
mod vote_store;

pub use errors::StoreError;
pub use file::FileKeyValueStore;
pub use interfaces::KeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use vote_store::VoteStore;

/// Key holding the local user's votes, effect id → `good`/`bad`.
pub const VOTES_KEY: &str = "ratings-votes";

/// Key holding local-only aggregates, effect id → `{likes, dislikes}`.
pub const AGGREGATE_KEY: &str = "ratings-aggregate";

/// Last unparseable votes document, kept when it gets replaced.
pub const VOTES_BACKUP_KEY: &str = "ratings-votes-corrupt";

/// Last unparseable aggregate document, kept when it gets replaced.
pub const AGGREGATE_BACKUP_KEY: &str = "ratings-aggregate-corrupt";
