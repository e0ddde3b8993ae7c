//! Environment-driven configuration for the photo effects client.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::path::PathBuf;

use image_generation::{GenerationSource, DEFAULT_BASE_URL, DEFAULT_MODEL};
use ratings_ledger::LedgerSource;

use crate::errors::ConfigError;

/// Default directory for local votes and local-only aggregates.
const DEFAULT_DATA_DIR: &str = ".photo-effects";

/// Client settings.
#[derive(Clone)]
pub struct ClientConfig {
    /// Remote ledger service; unset means aggregates stay local.
    pub ledger_url: Option<String>,
    pub data_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// Use the offline echo generator instead of Gemini.
    pub mock_generator: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("ledger_url", &self.ledger_url)
            .field("data_dir", &self.data_dir)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("mock_generator", &self.mock_generator)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RATINGS_LEDGER_URL`: ratings service base URL (default: local ledger)
    /// - `PHOTO_EFFECTS_DATA_DIR`: local state directory (default: .photo-effects)
    /// - `GEMINI_API_KEY` or `API_KEY`: image generation credentials
    /// - `GEMINI_BASE_URL`: generation endpoint (default: Google's public API)
    /// - `GEMINI_MODEL`: generation model name
    /// - `PHOTO_EFFECTS_MOCK_GENERATOR`: "true" to generate offline
    pub fn from_env() -> Result<Self, ConfigError> {
        let mock_generator = match non_empty_var("PHOTO_EFFECTS_MOCK_GENERATOR") {
            None => false,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "PHOTO_EFFECTS_MOCK_GENERATOR",
                    value,
                })?,
        };

        Ok(Self {
            ledger_url: non_empty_var("RATINGS_LEDGER_URL"),
            data_dir: non_empty_var("PHOTO_EFFECTS_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            gemini_api_key: non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY")),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            gemini_model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            mock_generator,
        })
    }

    /// Remote ledger when a URL is configured, otherwise the local one.
    pub fn ledger_source(&self) -> LedgerSource {
        match &self.ledger_url {
            Some(url) => LedgerSource::remote(url),
            None => LedgerSource::local(&self.data_dir),
        }
    }

    /// Generator backend; Gemini needs an API key unless mocking.
    pub fn generation_source(&self) -> Result<GenerationSource, ConfigError> {
        if self.mock_generator {
            return Ok(GenerationSource::Mock);
        }

        let api_key = self
            .gemini_api_key
            .clone()
            .ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?;

        Ok(GenerationSource::Gemini {
            api_key,
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
