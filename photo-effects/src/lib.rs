//! Photo Effects Library
//!
//! Client-side core of the photo effects app: pick an effect, send photos to
//! the image generator, and rate the effect.
//!
//! - [`catalog`]: the built-in effects, merged with ratings and sorted
//! - [`feedback`]: the vote flow between the local vote store and the ledger
//! - [`generation`]: one effect's generation session, single request at a time
//! - [`uploads`]: loading input photos from disk
//! - [`config`]: environment configuration and dependency wiring

pub mod catalog;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod generation;
pub mod uploads;

pub use config::{ClientConfig, Dependencies};
pub use errors::AppError;
