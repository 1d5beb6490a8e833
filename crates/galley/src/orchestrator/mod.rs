//! Request orchestrators.
//!
//! One [`Orchestrator`] owns the shared services (rate limiter, response
//! cache, cost ledger) and an optional provider per [`Capability`]. Every
//! public operation runs the same pipeline and returns an [`AiResponse`];
//! failures are reported in the envelope, never as `Err`.

mod pipeline;

use crate::{GalleyConfig, kitchen_system_prompt, plating_prompt};
use galley_cache::ResponseCache;
use galley_core::{
    AiResponse, ChatMessage, ChatRequest, ContentPart, FoodImage, FoodImageSet, ImageRequest,
    PlatingMethod, ProviderMessage, RequestOptions, Role, TextRequest,
};
use galley_cost::{CostRecord, CostTracker};
use galley_error::{ConfigError, GalleyResult};
use galley_interface::{ChatProvider, ImageProvider, TextProvider};
use galley_models::{
    AiSettings, DEFAULT_GROQ_MODEL, FallbackImageClient, HuggingFaceImageClient,
    HuggingFaceTextClient, OpenAICompatibleClient, OpenAIImageClient,
};
use galley_rate_limit::{FixedWindowLimiter, RetryPolicy};
use pipeline::Call;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Sampling temperature used when the caller sets none.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion token ceiling used when the caller sets none.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Message returned when the master switch is off.
pub const DISABLED_MESSAGE: &str = "AI features are disabled";

/// Message returned when the rate limiter rejects a call.
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// The AI capabilities an orchestrator can serve.
///
/// The snake-case name is the cost-ledger endpoint, the cache-key prefix and
/// the rate-limit namespace.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Chat completions with kitchen context
    Chat,
    /// Image plus prompt chat completions
    Vision,
    /// Dish image generation
    Image,
    /// Raw prompt completion through Groq
    GroqText,
    /// JSON-only text generation through HuggingFace Inference
    HuggingfaceText,
}

/// Facade over every AI provider.
///
/// Cheap to clone; clones share the limiter, cache and ledger.
///
/// # Example
///
/// ```no_run
/// use galley::{GalleyConfig, Orchestrator};
/// use galley_core::{ChatMessage, RequestOptions};
/// use galley_models::AiSettings;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = Orchestrator::from_settings(&AiSettings::from_env(), &GalleyConfig::load()?)?;
/// let response = orchestrator
///     .generate_ai_response(
///         &[ChatMessage::user("Suggest a special using leftover brisket")],
///         "US",
///         &RequestOptions::default(),
///     )
///     .await;
/// println!("{}", response.content);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    enabled: bool,
    chat: Option<Arc<dyn ChatProvider>>,
    vision: Option<Arc<dyn ChatProvider>>,
    image: Option<Arc<dyn ImageProvider>>,
    groq_text: Option<Arc<dyn ChatProvider>>,
    huggingface_text: Option<Arc<dyn TextProvider>>,
    limiter: Arc<FixedWindowLimiter>,
    cache: Arc<ResponseCache>,
    costs: Arc<CostTracker>,
    retry: RetryPolicy,
    default_cache_ttl: Duration,
    kitchen_context: Option<String>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |provider: Option<&'static str>| provider.unwrap_or("none");
        f.debug_struct("Orchestrator")
            .field("enabled", &self.enabled)
            .field("chat", &name(self.chat.as_ref().map(|p| p.provider_name())))
            .field("vision", &name(self.vision.as_ref().map(|p| p.provider_name())))
            .field("image", &name(self.image.as_ref().map(|p| p.provider_name())))
            .field("groq_text", &name(self.groq_text.as_ref().map(|p| p.provider_name())))
            .field(
                "huggingface_text",
                &name(self.huggingface_text.as_ref().map(|p| p.provider_name())),
            )
            .field("retry", &self.retry)
            .field("default_cache_ttl", &self.default_cache_ttl)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Start building an orchestrator with no providers and default services.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Wire real provider clients from environment settings and tuning config.
    ///
    /// Capabilities whose credentials are absent stay unconfigured and report
    /// an error envelope when called. Chat goes to Groq when `USE_GROQ` is
    /// set, otherwise OpenAI. Vision prefers OpenAI and falls back to the
    /// HuggingFace router. Images use HuggingFace first with OpenAI Images as
    /// the second vendor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `USE_GROQ` is set without
    /// `GROQ_API_KEY`, or if the tuning config is out of range.
    #[instrument(skip_all, fields(enabled = settings.enabled(), use_groq = settings.use_groq()))]
    pub fn from_settings(settings: &AiSettings, config: &GalleyConfig) -> GalleyResult<Self> {
        config.validate()?;

        let mut builder = Self::builder()
            .enabled(*settings.enabled())
            .limiter(FixedWindowLimiter::new(config.rate_limit))
            .cache(ResponseCache::with_quota(config.cache.quota_bytes))
            .costs(CostTracker::new(config.price_table()))
            .retry_policy(config.retry)
            .default_cache_ttl(config.cache.default_ttl());
        if let Some(context) = &config.kitchen_context {
            builder = builder.kitchen_context(context.clone());
        }

        if !settings.enabled() {
            info!("AI features disabled by configuration");
            return Ok(builder.build());
        }

        let openai_key = settings.openai_api_key().as_deref();
        let groq_key = settings.groq_api_key().as_deref();
        let huggingface_key = settings.huggingface_api_key().as_deref();

        if *settings.use_groq() {
            let key = groq_key.ok_or_else(|| {
                ConfigError::new("USE_GROQ is set but GROQ_API_KEY is not configured")
            })?;
            builder = builder.chat(OpenAICompatibleClient::groq(key, DEFAULT_GROQ_MODEL)?);
        } else if let Some(key) = openai_key {
            builder = builder.chat(OpenAICompatibleClient::openai(key, settings.openai_model())?);
        }

        if let Some(key) = groq_key {
            builder = builder.groq_text(OpenAICompatibleClient::groq(key, DEFAULT_GROQ_MODEL)?);
        }

        if let Some(key) = openai_key {
            builder = builder.vision(OpenAICompatibleClient::openai(key, settings.openai_model())?);
        } else if let Some(key) = huggingface_key {
            builder = builder.vision(OpenAICompatibleClient::huggingface_router(
                key,
                settings.huggingface_vision_model(),
            )?);
        }

        let huggingface_image = huggingface_key
            .map(|key| HuggingFaceImageClient::new(key, settings.huggingface_image_model()))
            .transpose()?
            .map(|client| Arc::new(client) as Arc<dyn ImageProvider>);
        let openai_image = openai_key
            .map(OpenAIImageClient::new)
            .transpose()?
            .map(|client| Arc::new(client) as Arc<dyn ImageProvider>);
        let image = match (huggingface_image, openai_image) {
            (Some(primary), Some(fallback)) => {
                Some(FallbackImageClient::new(primary).with_fallback(fallback))
            }
            (Some(primary), None) | (None, Some(primary)) => Some(FallbackImageClient::new(primary)),
            (None, None) => None,
        };
        if let Some(image) = image {
            builder = builder.image(image);
        }

        if let Some(key) = huggingface_key {
            builder = builder.huggingface_text(HuggingFaceTextClient::new(
                key,
                settings.huggingface_text_model(),
            )?);
        }

        let orchestrator = builder.build();
        debug!(?orchestrator, "Orchestrator assembled");
        Ok(orchestrator)
    }

    /// Whether `capability` has a provider and the master switch is on.
    pub fn is_available(&self, capability: Capability) -> bool {
        self.enabled
            && match capability {
                Capability::Chat => self.chat.is_some(),
                Capability::Vision => self.vision.is_some(),
                Capability::Image => self.image.is_some(),
                Capability::GroqText => self.groq_text.is_some(),
                Capability::HuggingfaceText => self.huggingface_text.is_some(),
            }
    }

    /// Chat completion with the kitchen system prompt for `country_code`
    /// prepended to `messages`.
    #[instrument(skip_all, fields(messages = messages.len(), country_code = %country_code))]
    pub async fn generate_ai_response(
        &self,
        messages: &[ChatMessage],
        country_code: &str,
        options: &RequestOptions,
    ) -> AiResponse<String> {
        let provider = match self.provider(Capability::Chat, &self.chat) {
            Ok(provider) => provider,
            Err(message) => return AiResponse::failure(message),
        };

        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(ProviderMessage::text(Role::System, self.system_prompt(country_code)));
        wire.extend(messages.iter().map(ProviderMessage::from));
        let request = chat_request(wire, options);

        let call = Call::new(
            Capability::Chat,
            options,
            &json!({
                "messages": messages,
                "countryCode": country_code,
                "options": options,
            }),
            provider.provider_name(),
            request.model.as_deref().unwrap_or(provider.model_name()),
        );
        self.execute(call, || provider.complete(&request)).await
    }

    /// Chat completion over an image and a prompt.
    ///
    /// `image_url` may be an HTTP(S) URL or a data URL.
    #[instrument(skip_all, fields(country_code = %country_code))]
    pub async fn generate_ai_vision_response(
        &self,
        image_url: &str,
        prompt: &str,
        country_code: &str,
        options: &RequestOptions,
    ) -> AiResponse<String> {
        let provider = match self.provider(Capability::Vision, &self.vision) {
            Ok(provider) => provider,
            Err(message) => return AiResponse::failure(message),
        };

        let request = chat_request(
            vec![
                ProviderMessage::text(Role::System, self.system_prompt(country_code)),
                ProviderMessage::parts(
                    Role::User,
                    vec![ContentPart::text(prompt), ContentPart::image(image_url)],
                ),
            ],
            options,
        );

        let call = Call::new(
            Capability::Vision,
            options,
            &json!({
                "imageUrl": image_url,
                "prompt": prompt,
                "countryCode": country_code,
                "options": options,
            }),
            provider.provider_name(),
            request.model.as_deref().unwrap_or(provider.model_name()),
        );
        self.execute(call, || provider.complete(&request)).await
    }

    /// One dish image for `prompt`.
    #[instrument(skip_all)]
    pub async fn generate_food_image(
        &self,
        prompt: &str,
        options: &RequestOptions,
    ) -> AiResponse<FoodImage> {
        let provider = match self.provider(Capability::Image, &self.image) {
            Ok(provider) => provider,
            Err(message) => return AiResponse::failure(message),
        };

        let request = ImageRequest {
            prompt: prompt.to_string(),
            model: options.model.clone(),
        };
        let model = request.model.clone().unwrap_or_else(|| "default".to_string());

        let call = Call::new(
            Capability::Image,
            options,
            &json!({ "prompt": prompt, "options": options }),
            provider.provider_name(),
            &model,
        )
        .without_cost();
        self.execute(call, || provider.generate_image(&request)).await
    }

    /// Four images of `dish_name`, one per plating method, generated
    /// concurrently. Each result succeeds or fails on its own.
    #[instrument(skip_all, fields(dish_name = %dish_name, ingredients = ingredients.len()))]
    pub async fn generate_food_images(
        &self,
        dish_name: &str,
        ingredients: &[String],
        options: &RequestOptions,
        instructions: Option<&str>,
    ) -> FoodImageSet {
        let prompt = |method| plating_prompt(method, dish_name, ingredients, instructions);
        let (classic, stacking, landscape, deconstructed) = (
            prompt(PlatingMethod::Classic),
            prompt(PlatingMethod::Stacking),
            prompt(PlatingMethod::Landscape),
            prompt(PlatingMethod::Deconstructed),
        );

        let (classic, stacking, landscape, deconstructed) = futures::join!(
            self.generate_food_image(&classic, options),
            self.generate_food_image(&stacking, options),
            self.generate_food_image(&landscape, options),
            self.generate_food_image(&deconstructed, options),
        );

        let set = FoodImageSet {
            classic,
            stacking,
            landscape,
            deconstructed,
        };
        debug!(succeeded = set.success_count(), "Plating set generated");
        set
    }

    /// Raw prompt completion through Groq, without kitchen context.
    #[instrument(skip_all)]
    pub async fn generate_text_with_groq(
        &self,
        prompt: &str,
        options: &RequestOptions,
    ) -> AiResponse<String> {
        let provider = match self.provider(Capability::GroqText, &self.groq_text) {
            Ok(provider) => provider,
            Err(message) => return AiResponse::failure(message),
        };

        let request = chat_request(vec![ProviderMessage::text(Role::User, prompt)], options);

        let call = Call::new(
            Capability::GroqText,
            options,
            &json!({ "prompt": prompt, "options": options }),
            provider.provider_name(),
            request.model.as_deref().unwrap_or(provider.model_name()),
        );
        self.execute(call, || provider.complete(&request)).await
    }

    /// JSON-only text generation through HuggingFace Inference.
    #[instrument(skip_all)]
    pub async fn generate_text_with_huggingface(
        &self,
        prompt: &str,
        options: &RequestOptions,
    ) -> AiResponse<String> {
        let provider = match self.provider(Capability::HuggingfaceText, &self.huggingface_text) {
            Ok(provider) => provider,
            Err(message) => return AiResponse::failure(message),
        };

        let request = TextRequest {
            prompt: prompt.to_string(),
            model: options.model.clone(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let call = Call::new(
            Capability::HuggingfaceText,
            options,
            &json!({ "prompt": prompt, "options": options }),
            provider.provider_name(),
            request.model.as_deref().unwrap_or(provider.model_name()),
        );
        self.execute(call, || provider.generate_text(&request)).await
    }

    /// Total spend recorded within the last `period`.
    pub fn total_cost(&self, period: Duration) -> f64 {
        self.costs.get_total_cost(period)
    }

    /// Spend per capability recorded within the last `period`.
    pub fn cost_by_endpoint(&self, period: Duration) -> BTreeMap<String, f64> {
        self.costs.cost_by_endpoint(period)
    }

    /// Snapshot of the cost ledger, oldest first.
    pub fn cost_records(&self) -> Vec<CostRecord> {
        self.costs.records()
    }

    /// Forget the rate limit window for `caller_id` on `capability`.
    pub fn reset_rate_limit(&self, capability: Capability, caller_id: Option<&str>) {
        self.limiter.reset_rate_limit(&rate_limit_id(capability, caller_id));
    }

    /// Drop expired rate limit windows.
    pub fn cleanup_rate_limits(&self) {
        self.limiter.cleanup_rate_limits();
    }

    /// Drop expired cache entries, returning how many were removed.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }

    /// Drop every cache entry.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn provider<P: ?Sized>(
        &self,
        capability: Capability,
        slot: &Option<Arc<P>>,
    ) -> Result<Arc<P>, String> {
        if !self.enabled {
            return Err(DISABLED_MESSAGE.to_string());
        }
        slot.clone()
            .ok_or_else(|| format!("{} is not configured", capability_label(capability)))
    }

    fn system_prompt(&self, country_code: &str) -> String {
        kitchen_system_prompt(country_code, self.kitchen_context.as_deref())
    }
}

fn capability_label(capability: Capability) -> &'static str {
    match capability {
        Capability::Chat => "AI chat",
        Capability::Vision => "AI vision",
        Capability::Image => "AI image generation",
        Capability::GroqText => "Groq text generation",
        Capability::HuggingfaceText => "HuggingFace text generation",
    }
}

pub(crate) fn rate_limit_id(capability: Capability, caller_id: Option<&str>) -> String {
    format!("{}:{}", capability, caller_id.unwrap_or("anonymous"))
}

fn chat_request(messages: Vec<ProviderMessage>, options: &RequestOptions) -> ChatRequest {
    ChatRequest {
        messages,
        model: options.model.clone(),
        temperature: Some(options.temperature.unwrap_or(DEFAULT_TEMPERATURE)),
        max_tokens: Some(options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
        response_format: options.response_format,
    }
}

/// Assembles an [`Orchestrator`] from injected providers and services.
///
/// # Example
///
/// ```
/// use galley::{Capability, Orchestrator};
/// use galley_rate_limit::{FixedWindowLimiter, RateLimitConfig, RetryPolicy};
///
/// let orchestrator = Orchestrator::builder()
///     .limiter(FixedWindowLimiter::new(RateLimitConfig::new(10, 60_000)))
///     .retry_policy(RetryPolicy::no_retry())
///     .build();
/// assert!(!orchestrator.is_available(Capability::Chat));
/// ```
#[derive(Default)]
pub struct OrchestratorBuilder {
    enabled: Option<bool>,
    chat: Option<Arc<dyn ChatProvider>>,
    vision: Option<Arc<dyn ChatProvider>>,
    image: Option<Arc<dyn ImageProvider>>,
    groq_text: Option<Arc<dyn ChatProvider>>,
    huggingface_text: Option<Arc<dyn TextProvider>>,
    limiter: Option<Arc<FixedWindowLimiter>>,
    cache: Option<Arc<ResponseCache>>,
    costs: Option<Arc<CostTracker>>,
    retry: Option<RetryPolicy>,
    default_cache_ttl: Option<Duration>,
    kitchen_context: Option<String>,
}

impl OrchestratorBuilder {
    /// Master switch (default on).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Chat provider.
    pub fn chat(self, provider: impl ChatProvider + 'static) -> Self {
        self.chat_arc(Arc::new(provider))
    }

    /// Shared chat provider.
    pub fn chat_arc(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.chat = Some(provider);
        self
    }

    /// Vision provider.
    pub fn vision(self, provider: impl ChatProvider + 'static) -> Self {
        self.vision_arc(Arc::new(provider))
    }

    /// Shared vision provider.
    pub fn vision_arc(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.vision = Some(provider);
        self
    }

    /// Image provider.
    pub fn image(self, provider: impl ImageProvider + 'static) -> Self {
        self.image_arc(Arc::new(provider))
    }

    /// Shared image provider.
    pub fn image_arc(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.image = Some(provider);
        self
    }

    /// Groq raw text provider.
    pub fn groq_text(self, provider: impl ChatProvider + 'static) -> Self {
        self.groq_text_arc(Arc::new(provider))
    }

    /// Shared Groq raw text provider.
    pub fn groq_text_arc(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.groq_text = Some(provider);
        self
    }

    /// HuggingFace text provider.
    pub fn huggingface_text(self, provider: impl TextProvider + 'static) -> Self {
        self.huggingface_text_arc(Arc::new(provider))
    }

    /// Shared HuggingFace text provider.
    pub fn huggingface_text_arc(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.huggingface_text = Some(provider);
        self
    }

    /// Rate limiter (default: 50 requests per hour).
    pub fn limiter(self, limiter: FixedWindowLimiter) -> Self {
        self.shared_limiter(Arc::new(limiter))
    }

    /// Rate limiter shared with other orchestrators.
    pub fn shared_limiter(mut self, limiter: Arc<FixedWindowLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Response cache (default: 5 MiB session store).
    pub fn cache(self, cache: ResponseCache) -> Self {
        self.shared_cache(Arc::new(cache))
    }

    /// Response cache shared with other orchestrators.
    pub fn shared_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Cost ledger (default: built-in price table).
    pub fn costs(self, costs: CostTracker) -> Self {
        self.shared_costs(Arc::new(costs))
    }

    /// Cost ledger shared with other orchestrators.
    pub fn shared_costs(mut self, costs: Arc<CostTracker>) -> Self {
        self.costs = Some(costs);
        self
    }

    /// Retry policy (default: 3 attempts, 1000 ms base).
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// TTL for requests that set no `cacheTTL` (default: one hour).
    pub fn default_cache_ttl(mut self, ttl: Duration) -> Self {
        self.default_cache_ttl = Some(ttl);
        self
    }

    /// Extra text appended to the kitchen system prompt.
    pub fn kitchen_context(mut self, context: impl Into<String>) -> Self {
        self.kitchen_context = Some(context.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Orchestrator {
        Orchestrator {
            enabled: self.enabled.unwrap_or(true),
            chat: self.chat,
            vision: self.vision,
            image: self.image,
            groq_text: self.groq_text,
            huggingface_text: self.huggingface_text,
            limiter: self.limiter.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            costs: self.costs.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
            default_cache_ttl: self
                .default_cache_ttl
                .unwrap_or_else(|| crate::CacheSettings::default().default_ttl()),
            kitchen_context: self.kitchen_context,
        }
    }
}
