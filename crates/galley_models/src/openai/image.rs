//! OpenAI Images client.

use super::dto::{ImageGenerationRequest, ImageGenerationResponse};
use crate::http::{send_error, status_error};
use crate::image_data::normalize_base64_image;
use async_trait::async_trait;
use galley_core::{Completion, FoodImage, ImageRequest};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use galley_interface::ImageProvider;
use reqwest::Client;
use tracing::{debug, instrument};

/// OpenAI image-generation endpoint.
pub const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";
/// Image model used when none is requested.
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";

const IMAGE_SIZE: &str = "1024x1024";

/// OpenAI Images client returning base64 payloads.
#[derive(Clone)]
pub struct OpenAIImageClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for OpenAIImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIImageClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAIImageClient {
    /// Creates a client using [`DEFAULT_OPENAI_IMAGE_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> ProviderResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
                "OpenAI".to_string(),
            )));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_OPENAI_IMAGE_MODEL.to_string(),
            endpoint: OPENAI_IMAGES_URL.to_string(),
        })
    }

    /// Use `model` instead of the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ImageProvider for OpenAIImageClient {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_len = request.prompt.len()))]
    async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<Completion<FoodImage>> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = ImageGenerationRequest {
            model,
            prompt: &request.prompt,
            n: 1,
            size: IMAGE_SIZE,
            response_format: "b64_json",
        };

        debug!(endpoint = %self.endpoint, "Sending image generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: ImageGenerationResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!("image generation body: {}", e)))
        })?;

        let encoded = parsed
            .data
            .into_iter()
            .find_map(|datum| datum.b64_json)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;

        let image = normalize_base64_image(&encoded, None)?;
        debug!(mime_type = ?image.mime_type, "Received generated image");

        Ok(Completion::new(image, None, model))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
