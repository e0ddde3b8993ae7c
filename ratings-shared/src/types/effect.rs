use serde::{Deserialize, Serialize};

use crate::types::EffectId;
use crate::SharedError;

/// Number of photos an effect needs before it can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ImageCount {
    One,
    Two,
}

impl ImageCount {
    pub fn get(self) -> usize {
        match self {
            ImageCount::One => 1,
            ImageCount::Two => 2,
        }
    }
}

impl TryFrom<u8> for ImageCount {
    type Error = SharedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ImageCount::One),
            2 => Ok(ImageCount::Two),
            other => Err(SharedError::InvalidImageCount(other)),
        }
    }
}

impl From<ImageCount> for u8 {
    fn from(count: ImageCount) -> Self {
        count.get() as u8
    }
}

/// A named image-transformation preset.
///
/// Effects are read-only configuration: the prompt is sent verbatim to the
/// image generator together with `image_count` uploaded photos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: EffectId,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub image_count: ImageCount,
    #[serde(default)]
    pub image_labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_deserializes_image_count() {
        let effect: Effect = serde_json::from_str(
            r#"{
                "id": "swap",
                "title": "Face Swap",
                "description": "Swap faces",
                "prompt": "swap the faces",
                "imageCount": 2,
                "imageLabels": ["Source", "Target"]
            }"#,
        )
        .unwrap();
        assert_eq!(effect.image_count, ImageCount::Two);
        assert_eq!(effect.image_labels.len(), 2);
    }

    #[test]
    fn test_effect_rejects_three_images() {
        let result: Result<Effect, _> = serde_json::from_str(
            r#"{"id":"x","title":"x","description":"x","prompt":"x","imageCount":3}"#,
        );
        assert!(result.is_err());
    }
}
