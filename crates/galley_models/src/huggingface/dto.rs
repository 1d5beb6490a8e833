//! HuggingFace Inference API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Text-generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Builder)]
#[builder(default)]
pub(crate) struct HuggingFaceParameters {
    /// Maximum tokens to generate
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    /// Temperature for sampling
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Whether the prompt is echoed back in `generated_text`
    return_full_text: bool,
}

impl HuggingFaceParameters {
    /// Creates a new builder for `HuggingFaceParameters`.
    pub fn builder() -> HuggingFaceParametersBuilder {
        HuggingFaceParametersBuilder::default()
    }
}

/// Text-generation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub(crate) struct HuggingFaceTextRequest {
    /// Prompt text
    inputs: String,
    /// Generation parameters
    parameters: HuggingFaceParameters,
}

impl HuggingFaceTextRequest {
    /// Creates a new builder for `HuggingFaceTextRequest`.
    pub fn builder() -> HuggingFaceTextRequestBuilder {
        HuggingFaceTextRequestBuilder::default()
    }
}

/// Text-to-image request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct HuggingFaceImageRequest<'a> {
    pub inputs: &'a str,
}

/// One generated sequence.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedText {
    pub generated_text: String,
}

/// Text-generation responses come back either as a list or a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum HuggingFaceTextResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl HuggingFaceTextResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            HuggingFaceTextResponse::Many(items) => {
                items.into_iter().next().map(|item| item.generated_text)
            }
            HuggingFaceTextResponse::One(item) => Some(item.generated_text),
        }
    }
}
