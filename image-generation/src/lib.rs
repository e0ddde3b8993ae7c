//! Client for the generative image service.
//!
//! This crate provides:
//! - [`ImageGenerator`] trait abstracting the generation call
//! - [`GeminiImageGenerator`] production client for a Gemini-style
//!   `generateContent` endpoint
//! - [`MockImageGenerator`] scripted generator for tests and offline runs
//! - [`GenerationSource`] config enum choosing between the two
//!
//! Failures are reduced to the four kinds of [`GenerationError`]. There is
//! no timeout and no automatic retry; a retry is always an explicit new call.

mod errors;
mod gemini;
mod mock;

pub use errors::GenerationError;
pub use gemini::{GeminiImageGenerator, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock::{MockImageGenerator, RecordedCall};

use std::sync::Arc;

use async_trait::async_trait;
use ratings_shared::types::{GeneratedImage, UploadedImage};

/// Trait for turning a prompt plus input photos into an image.
///
/// # Example
///
/// ```ignore
/// use image_generation::ImageGenerator;
///
/// async fn render<G: ImageGenerator>(generator: &G, photo: UploadedImage) -> Result<GeneratedImage, GenerationError> {
///     generator.generate("Make it look like a 1970s postcard", &[photo]).await
/// }
/// ```
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image from `prompt` and one or two input `images`.
    async fn generate(
        &self,
        prompt: &str,
        images: &[UploadedImage],
    ) -> Result<GeneratedImage, GenerationError>;
}

/// Configuration for the image generation backend.
#[derive(Debug, Clone)]
pub enum GenerationSource {
    /// Offline generator that echoes the first input image back.
    Mock,

    /// A live Gemini-compatible endpoint.
    Gemini {
        api_key: String,
        base_url: String,
        model: String,
    },
}

impl GenerationSource {
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create the appropriate `ImageGenerator` implementation.
    pub fn into_generator(self) -> Arc<dyn ImageGenerator> {
        match self {
            Self::Mock => Arc::new(MockImageGenerator::echo()),
            Self::Gemini {
                api_key,
                base_url,
                model,
            } => Arc::new(
                GeminiImageGenerator::new(api_key)
                    .with_base_url(&base_url)
                    .with_model(model),
            ),
        }
    }
}
