//! A generation session for one effect.
//!
//! Holds the uploaded photos, runs at most one generation request at a time,
//! and keeps the last request so a failure can be retried as-is.
use std::sync::Arc;

use image_generation::{GenerationError, ImageGenerator};
use ratings_shared::types::{Effect, GeneratedImage, UploadedImage};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::SessionError;

#[derive(Debug, Clone)]
struct GenerationRequest {
    prompt: String,
    images: Vec<UploadedImage>,
}

#[derive(Default)]
struct SessionState {
    images: Vec<UploadedImage>,
    last_request: Option<GenerationRequest>,
    last_result: Option<Result<GeneratedImage, GenerationError>>,
}

pub struct GenerationSession {
    effect: Effect,
    generator: Arc<dyn ImageGenerator>,
    state: Mutex<SessionState>,
    in_flight: Mutex<()>,
}

impl GenerationSession {
    pub fn new(effect: Effect, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            effect,
            generator,
            state: Mutex::new(SessionState::default()),
            in_flight: Mutex::new(()),
        }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Replace the uploaded photos. Clears any previous result.
    pub async fn set_images(&self, images: Vec<UploadedImage>) -> Result<(), SessionError> {
        let allowed = self.effect.image_count.get();
        if images.len() > allowed {
            return Err(SessionError::TooManyImages {
                allowed,
                provided: images.len(),
            });
        }

        let mut state = self.state.lock().await;
        state.images = images;
        state.last_result = None;
        Ok(())
    }

    /// Whether enough photos are uploaded to generate.
    pub async fn is_ready(&self) -> bool {
        self.state.lock().await.images.len() == self.effect.image_count.get()
    }

    /// The outcome of the most recent request, if one finished.
    pub async fn last_result(&self) -> Option<Result<GeneratedImage, GenerationError>> {
        self.state.lock().await.last_result.clone()
    }

    /// Send the effect prompt and the uploaded photos to the generator.
    pub async fn generate(&self) -> Result<GeneratedImage, SessionError> {
        let _in_flight = self
            .in_flight
            .try_lock()
            .map_err(|_| SessionError::InFlight)?;

        let request = {
            let mut state = self.state.lock().await;
            let required = self.effect.image_count.get();
            if state.images.len() < required {
                return Err(SessionError::MissingImages {
                    required,
                    provided: state.images.len(),
                });
            }

            let request = GenerationRequest {
                prompt: self.effect.prompt.clone(),
                images: state.images.clone(),
            };
            state.last_request = Some(request.clone());
            state.last_result = None;
            request
        };

        self.run(request).await
    }

    /// Re-issue the last request with the same inputs.
    pub async fn retry(&self) -> Result<GeneratedImage, SessionError> {
        let _in_flight = self
            .in_flight
            .try_lock()
            .map_err(|_| SessionError::InFlight)?;

        let request = self
            .state
            .lock()
            .await
            .last_request
            .clone()
            .ok_or(SessionError::NothingToRetry)?;

        info!(effect_id = %self.effect.id, "Retrying generation");
        self.run(request).await
    }

    async fn run(&self, request: GenerationRequest) -> Result<GeneratedImage, SessionError> {
        let result = self
            .generator
            .generate(&request.prompt, &request.images)
            .await;

        match &result {
            Ok(image) => info!(
                effect_id = %self.effect.id,
                bytes = image.bytes.len(),
                mime_type = %image.mime_type,
                "Generation finished"
            ),
            Err(e) => warn!(
                effect_id = %self.effect.id,
                code = e.code(),
                error = %e,
                "Generation failed"
            ),
        }

        self.state.lock().await.last_result = Some(result.clone());
        result.map_err(SessionError::from)
    }
}
