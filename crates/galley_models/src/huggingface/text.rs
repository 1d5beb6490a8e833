//! JSON-only text generation on the HuggingFace Inference API.

use super::dto::{HuggingFaceParameters, HuggingFaceTextRequest, HuggingFaceTextResponse};
use super::{HUGGINGFACE_INFERENCE_URL, MAX_WARMUP_WAIT, require_key, send_with_warmup};
use crate::http::status_error;
use async_trait::async_trait;
use galley_core::{Completion, TextRequest};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use galley_interface::TextProvider;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Instruction prepended to every prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "You are a helpful assistant that only responds with valid JSON. \
Do not include any explanatory text, markdown formatting, or code blocks. \
Respond only with the JSON object.";

/// HuggingFace text-generation client for JSON-producing tasks.
///
/// Output has Markdown code fences stripped. A cold model is waited out
/// once before an error is reported.
#[derive(Clone)]
pub struct HuggingFaceTextClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_warmup_wait: Duration,
}

impl std::fmt::Debug for HuggingFaceTextClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceTextClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceTextClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] if `api_key` is empty.
    #[instrument(skip_all)]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> ProviderResult<Self> {
        let api_key = require_key(api_key.into())?;
        let model = model.into();
        debug!(model = %model, "Created HuggingFace text client");

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
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

    fn build_request(&self, request: &TextRequest) -> ProviderResult<HuggingFaceTextRequest> {
        let mut params = HuggingFaceParameters::builder();
        params.return_full_text(false);
        if let Some(max_tokens) = request.max_tokens {
            params.max_new_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            params.temperature(temperature);
        }
        let params = params.build().map_err(|e| {
            ProviderError::new(ProviderErrorKind::Builder(format!("parameters: {}", e)))
        })?;

        HuggingFaceTextRequest::builder()
            .inputs(format!("{}\n\n{}", JSON_ONLY_INSTRUCTION, request.prompt))
            .parameters(params)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Builder(format!("request: {}", e))))
    }
}

#[async_trait]
impl TextProvider for HuggingFaceTextClient {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_len = request.prompt.len()))]
    async fn generate_text(&self, request: &TextRequest) -> ProviderResult<Completion> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let url = format!("{}/{}", self.base_url, model);
        let body = self.build_request(request)?;

        debug!(url = %url, inputs_len = body.inputs().len(), "Sending request to HuggingFace");

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

        let parsed: HuggingFaceTextResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!("text generation body: {}", e)))
        })?;
        let text = parsed
            .into_text()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;

        let content = strip_code_fences(&text);
        debug!(response_len = content.len(), "Received response");

        Ok(Completion::new(content, None, model))
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Remove a surrounding Markdown code fence, if any.
///
/// # Example
///
/// ```
/// use galley_models::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // Drop the language tag line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}
