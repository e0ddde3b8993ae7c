//! Mock image generator for testing and offline runs.
//!
//! Responses are scripted in order; once the script runs out the generator
//! falls back to its default behaviour. Every call is recorded so tests can
//! assert what was sent.
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use ratings_shared::types::{GeneratedImage, UploadedImage, MIME_JPEG};
use tokio::sync::Mutex;

use crate::{GenerationError, ImageGenerator};

/// A single `generate` call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub images: Vec<UploadedImage>,
}

enum Fallback {
    /// Return the first input image unchanged.
    Echo,
    Fail(GenerationError),
}

/// Scripted image generator.
pub struct MockImageGenerator {
    script: Mutex<VecDeque<Result<GeneratedImage, GenerationError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    fallback: Fallback,
    delay: Duration,
}

impl MockImageGenerator {
    /// Generator that echoes the first input image back once the script is empty.
    pub fn echo() -> Self {
        Self::with_fallback(Fallback::Echo)
    }

    /// Generator that fails with `error` once the script is empty.
    pub fn failing(error: GenerationError) -> Self {
        Self::with_fallback(Fallback::Fail(error))
    }

    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fallback,
            delay: Duration::ZERO,
        }
    }

    /// Wait this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue the answer for the next unanswered call.
    pub async fn push_response(&self, response: Result<GeneratedImage, GenerationError>) {
        self.script.lock().await.push_back(response);
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        images: &[UploadedImage],
    ) -> Result<GeneratedImage, GenerationError> {
        self.calls.lock().await.push(RecordedCall {
            prompt: prompt.to_string(),
            images: images.to_vec(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(response) = self.script.lock().await.pop_front() {
            return response;
        }

        match &self.fallback {
            Fallback::Echo => images
                .first()
                .map(|image| GeneratedImage::new(image.bytes.clone(), image.mime_type.clone()))
                .ok_or(GenerationError::NoImageGenerated),
            Fallback::Fail(error) => Err(error.clone()),
        }
    }
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::echo()
    }
}
