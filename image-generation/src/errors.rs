use thiserror::Error;

/// The fixed set of ways a generation request can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The service refused the request on safety grounds.
    #[error("Request blocked by safety policy: {0}")]
    SafetyBlock(String),

    /// The service answered but returned no image.
    #[error("No image was generated")]
    NoImageGenerated,

    /// Transport failure or an error status from the service.
    #[error("Image service error: {0}")]
    Api(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GenerationError {
    /// Stable tag for this failure kind, suitable for display lookups.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::SafetyBlock(_) => "SAFETY_BLOCK",
            GenerationError::NoImageGenerated => "NO_IMAGE_GENERATED",
            GenerationError::Api(_) => "API_ERROR",
            GenerationError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.to_string())
    }
}
