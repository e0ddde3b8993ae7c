//! Production client for a Gemini `generateContent` endpoint.
//!
//! Request shape: the input photos as inline base64 parts followed by the
//! prompt text, with the response modality restricted to images. The answer
//! is interpreted in this order:
//!
//! 1. a `promptFeedback.blockReason` means the request was blocked
//! 2. the first inline data part of the first candidate is the image
//! 3. anything else means no image was produced
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use ratings_shared::types::{GeneratedImage, UploadedImage, MIME_JPEG};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::{GenerationError, ImageGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Image generator backed by a Gemini-compatible HTTP API.
pub struct GeminiImageGenerator {
    api_key: String,
    base_url: String,
    model: String,
    client: ReqwestClient,
}

impl GeminiImageGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: ReqwestClient::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_client(mut self, client: ReqwestClient) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData },
    Text { text: &'a str },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

fn build_request<'a>(prompt: &'a str, images: &[UploadedImage]) -> GenerateContentRequest<'a> {
    let mut parts: Vec<RequestPart<'a>> = images
        .iter()
        .map(|image| RequestPart::InlineData {
            inline_data: InlineData {
                mime_type: Some(image.mime_type.clone()),
                data: general_purpose::STANDARD.encode(&image.bytes),
            },
        })
        .collect();
    parts.push(RequestPart::Text { text: prompt });

    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE"],
        },
    }
}

fn interpret_response(response: GenerateContentResponse) -> Result<GeneratedImage, GenerationError> {
    if let Some(reason) = response.prompt_feedback.and_then(|feedback| feedback.block_reason) {
        warn!(reason = %reason, "Request blocked by safety policy");
        return Err(GenerationError::SafetyBlock(reason));
    }

    let inline_data = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.inline_data));

    let Some(inline_data) = inline_data else {
        warn!("Response received, but no image data was found");
        return Err(GenerationError::NoImageGenerated);
    };

    let bytes = general_purpose::STANDARD
        .decode(inline_data.data.as_bytes())
        .map_err(|e| GenerationError::Unknown(format!("invalid image payload: {e}")))?;
    let mime_type = inline_data.mime_type.unwrap_or_else(|| MIME_JPEG.to_string());

    Ok(GeneratedImage::new(bytes, mime_type))
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        images: &[UploadedImage],
    ) -> Result<GeneratedImage, GenerationError> {
        let url = self.endpoint();
        let request = build_request(prompt, images);
        debug!(url = %url, images = images.len(), "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Error calling image service");
                GenerationError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Image service returned an error");
            return Err(GenerationError::Api(format!("{status}: {body}")));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let image = interpret_response(parsed)?;
        debug!(bytes = image.bytes.len(), mime_type = %image.mime_type, "Image generated");
        Ok(image)
    }
}
