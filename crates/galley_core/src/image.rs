//! Generated food image types.

use crate::AiResponse;
use serde::{Deserialize, Serialize};

/// A generated image normalized into a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodImage {
    /// `data:<mime>;base64,<payload>` URL
    pub image_url: String,
    /// Bare base64 payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// Validated MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FoodImage {
    /// True when no image was produced.
    pub fn is_empty(&self) -> bool {
        self.image_url.is_empty()
    }
}

/// Prompt-shaping strategy for dish photography.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlatingMethod {
    /// Traditional centered plating
    Classic,
    /// Vertical, layered components
    Stacking,
    /// Components spread across a wide plate
    Landscape,
    /// Components presented separately
    Deconstructed,
}

/// One image result per plating method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodImageSet {
    /// Classic plating
    pub classic: AiResponse<FoodImage>,
    /// Stacked plating
    pub stacking: AiResponse<FoodImage>,
    /// Landscape plating
    pub landscape: AiResponse<FoodImage>,
    /// Deconstructed plating
    pub deconstructed: AiResponse<FoodImage>,
}

impl FoodImageSet {
    /// Result for one plating method.
    pub fn get(&self, method: PlatingMethod) -> &AiResponse<FoodImage> {
        match method {
            PlatingMethod::Classic => &self.classic,
            PlatingMethod::Stacking => &self.stacking,
            PlatingMethod::Landscape => &self.landscape,
            PlatingMethod::Deconstructed => &self.deconstructed,
        }
    }

    /// Number of methods that produced an image.
    pub fn success_count(&self) -> usize {
        [
            &self.classic,
            &self.stacking,
            &self.landscape,
            &self.deconstructed,
        ]
        .iter()
        .filter(|response| response.is_success())
        .count()
    }
}
