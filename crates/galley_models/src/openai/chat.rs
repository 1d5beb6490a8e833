//! Chat-completions client shared by OpenAI, Groq and the HuggingFace router.

use super::dto::{ChatCompletionRequest, ChatCompletionResponse};
use crate::http::{send_error, status_error};
use async_trait::async_trait;
use galley_core::{ChatRequest, Completion, ResponseFormat};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use galley_interface::ChatProvider;
use reqwest::Client;
use tracing::{debug, instrument};

/// OpenAI chat-completions endpoint.
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Groq's OpenAI-compatible endpoint.
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// HuggingFace router's OpenAI-compatible endpoint, used for vision models.
pub const HUGGINGFACE_ROUTER_CHAT_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Client for any endpoint speaking the chat-completions protocol.
///
/// Vision requests are ordinary chat requests whose user message carries
/// `image_url` parts.
#[derive(Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    provider: &'static str,
}

impl std::fmt::Debug for OpenAICompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatibleClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAICompatibleClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] if `api_key` is empty.
    #[instrument(skip_all, fields(provider = provider))]
    pub fn new(
        api_key: impl Into<String>,
        model: impl AsRef<str>,
        endpoint: impl Into<String>,
        provider: &'static str,
    ) -> ProviderResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
                display_name(provider).to_string(),
            )));
        }

        let endpoint = endpoint.into();
        debug!(provider, endpoint = %endpoint, "Created chat client");

        Ok(Self {
            client: Client::new(),
            api_key,
            model: model.as_ref().to_string(),
            endpoint,
            provider,
        })
    }

    /// OpenAI chat client.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    pub fn openai(api_key: impl Into<String>, model: impl AsRef<str>) -> ProviderResult<Self> {
        Self::new(api_key, model, OPENAI_CHAT_URL, "openai")
    }

    /// Groq chat client.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    pub fn groq(api_key: impl Into<String>, model: impl AsRef<str>) -> ProviderResult<Self> {
        Self::new(api_key, model, GROQ_CHAT_URL, "groq")
    }

    /// HuggingFace router chat client, used for vision models.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    pub fn huggingface_router(
        api_key: impl Into<String>,
        model: impl AsRef<str>,
    ) -> ProviderResult<Self> {
        Self::new(api_key, model, HUGGINGFACE_ROUTER_CHAT_URL, "huggingface")
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatProvider for OpenAICompatibleClient {
    #[instrument(skip(self, request), fields(provider = self.provider, model = %self.model, messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> ProviderResult<Completion> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: (request.response_format == ResponseFormat::JsonObject)
                .then_some(ResponseFormat::JsonObject),
        };

        debug!(endpoint = %self.endpoint, "Sending chat completion request");

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

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "chat completion body: {}",
                e
            )))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;
        let content = choice.message.content.unwrap_or_default();
        let usage = parsed.usage.map(Into::into);

        debug!(content_len = content.len(), ?usage, "Received chat completion");

        Ok(Completion::new(
            content,
            usage,
            parsed.model.unwrap_or_else(|| model.to_string()),
        ))
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn display_name(provider: &str) -> &str {
    match provider {
        "openai" => "OpenAI",
        "groq" => "Groq",
        "huggingface" => "HuggingFace",
        other => other,
    }
}
