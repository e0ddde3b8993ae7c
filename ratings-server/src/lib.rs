//! # Ratings Server
//!
//! HTTP service that owns the authoritative like/dislike aggregates for every
//! effect. Clients read the whole table and submit votes; the service applies
//! the reconciling update through a [`ratings_ledger::RatingLedger`].
//!
//! ## Routes
//!
//! - `GET /ratings`: every aggregate, `{ "<effect>": { "likes": n, "dislikes": n } }`
//! - `POST /votes`: body `{ "effectId", "newChoice", "previousChoice"? }`,
//!   responds with the effect's updated aggregate
//! - `GET /health`: liveness probe
pub mod config;
pub mod errors;
pub mod server;

pub use config::ServerConfig;
pub use errors::{ConfigError, ServerError};
pub use server::{create_app, run_server};
