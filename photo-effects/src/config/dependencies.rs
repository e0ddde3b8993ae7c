//! Dependency wiring for the photo effects client.

use std::sync::Arc;

use image_generation::{GenerationSource, ImageGenerator};
use ratings_store::{FileKeyValueStore, VoteStore};
use tracing::{info, warn};

use super::ClientConfig;
use crate::catalog::EffectCatalog;
use crate::errors::{AppError, ConfigError};
use crate::feedback::FeedbackService;

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub catalog: EffectCatalog,
    pub feedback: FeedbackService,
    generator: Result<Arc<dyn ImageGenerator>, ConfigError>,
}

impl Dependencies {
    /// Build the catalog, the vote flow and the image generator.
    ///
    /// A missing generator configuration is not an error here; it only
    /// surfaces when something asks for [`Dependencies::generator`].
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let catalog = EffectCatalog::builtin()?;

        let ledger_source = config.ledger_source();
        info!(?ledger_source, "Using ratings ledger");

        let store = Arc::new(FileKeyValueStore::new(&config.data_dir));
        let feedback = FeedbackService::new(ledger_source.into_ledger(), VoteStore::new(store));

        let generator = config.generation_source().map(|source| {
            if matches!(source, GenerationSource::Mock) {
                warn!("Using the offline mock image generator");
            }
            source.into_generator()
        });

        Ok(Self {
            catalog,
            feedback,
            generator,
        })
    }

    /// The configured generator, or why there is none.
    pub fn generator(&self) -> Result<Arc<dyn ImageGenerator>, ConfigError> {
        self.generator.clone()
    }
}
