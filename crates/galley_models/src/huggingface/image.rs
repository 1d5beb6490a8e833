//! Text-to-image generation on the HuggingFace Inference API.

use super::dto::HuggingFaceImageRequest;
use super::{HUGGINGFACE_INFERENCE_URL, MAX_WARMUP_WAIT, require_key, send_with_warmup};
use crate::http::status_error;
use crate::image_data::normalize_image_bytes;
use async_trait::async_trait;
use galley_core::{Completion, FoodImage, ImageRequest};
use galley_error::ProviderResult;
use galley_interface::ImageProvider;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, instrument};

/// HuggingFace text-to-image client; the response body is the raw image.
#[derive(Clone)]
pub struct HuggingFaceImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_warmup_wait: Duration,
}

impl std::fmt::Debug for HuggingFaceImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceImageClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceImageClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> ProviderResult<Self> {
        Ok(Self {
            client: Client::new(),
            api_key: require_key(api_key.into())?,
            model: model.into(),
            base_url: HUGGINGFACE_INFERENCE_URL.to_string(),
            max_warmup_wait: MAX_WARMUP_WAIT,
        })
    }

    /// Use a different inference base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cap the warm-up wait below [`MAX_WARMUP_WAIT`].
    pub fn with_max_warmup_wait(mut self, max_wait: Duration) -> Self {
        self.max_warmup_wait = max_wait.min(MAX_WARMUP_WAIT);
        self
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceImageClient {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_len = request.prompt.len()))]
    async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<Completion<FoodImage>> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let url = format!("{}/{}", self.base_url, model);
        let body = HuggingFaceImageRequest {
            inputs: &request.prompt,
        };

        debug!(url = %url, "Sending image request to HuggingFace");

        let response = send_with_warmup(self.max_warmup_wait, || {
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
        })
        .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(crate::http::send_error)?;

        debug!(bytes = bytes.len(), content_type = ?content_type, "Received image");

        let image = normalize_image_bytes(&bytes, content_type.as_deref())?;
        Ok(Completion::new(image, None, model))
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}
