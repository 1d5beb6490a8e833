//! The request pipeline shared by every capability.
//!
//! Rate limit, cache lookup, retried provider call, cost recording and cache
//! write, in that order. Cache lookup always precedes the provider call and
//! cost is recorded only after a successful one.

use super::{Capability, Orchestrator, RATE_LIMITED_MESSAGE, rate_limit_id};
use galley_cache::generate_cache_key;
use galley_core::{AiResponse, Completion, RequestOptions};
use galley_error::{AiError, ProviderError, ProviderErrorKind, ProviderResult, classify_provider};
use galley_models::LlmMetrics;
use galley_rate_limit::retry_with_backoff;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One orchestrated call, described before any work happens.
#[derive(Debug, Clone)]
pub(crate) struct Call<'a> {
    capability: Capability,
    options: &'a RequestOptions,
    cache_key: String,
    provider: &'static str,
    model: String,
    record_cost: bool,
}

impl<'a> Call<'a> {
    pub(crate) fn new<P: Serialize + ?Sized>(
        capability: Capability,
        options: &'a RequestOptions,
        cache_payload: &P,
        provider: &'static str,
        model: &str,
    ) -> Self {
        Self {
            capability,
            options,
            cache_key: generate_cache_key(capability.as_ref(), cache_payload),
            provider,
            model: model.to_string(),
            record_cost: true,
        }
    }

    /// Skip the cost ledger for this call.
    pub(crate) fn without_cost(mut self) -> Self {
        self.record_cost = false;
        self
    }
}

impl Orchestrator {
    /// Run `call` through the pipeline, invoking `send` once per attempt.
    pub(crate) async fn execute<T, F, Fut>(&self, call: Call<'_>, mut send: F) -> AiResponse<T>
    where
        T: Serialize + DeserializeOwned + Default + PartialEq,
        F: FnMut() -> Fut,
        Fut: Future<Output = ProviderResult<Completion<T>>>,
    {
        let capability = call.capability;
        let options = call.options;

        let limit_id = rate_limit_id(capability, options.caller_id.as_deref());
        if !self.limiter.check_rate_limit(&limit_id) {
            warn!(%capability, id = %limit_id, "Request rejected by rate limiter");
            return AiResponse::failure(RATE_LIMITED_MESSAGE);
        }

        if options.use_cache() {
            if let Some(content) = self.cached::<T>(&call.cache_key) {
                debug!(%capability, key = %call.cache_key, "Serving cached response");
                return AiResponse::from_cache(content);
            }
        }

        let metrics = LlmMetrics::get();
        let timeout = options.timeout();
        let outcome = retry_with_backoff(
            &self.retry,
            |err: &AiError| err.retryable,
            |attempt| {
                let pending = send();
                let call = &call;
                async move {
                    let started = Instant::now();
                    let result = match timeout {
                        Some(limit) => match tokio::time::timeout(limit, pending).await {
                            Ok(result) => result,
                            Err(_) => Err(timed_out(limit)),
                        },
                        None => pending.await,
                    };
                    match result {
                        Ok(completion) => {
                            metrics.record_request(
                                call.provider,
                                &completion.model,
                                started.elapsed().as_secs_f64(),
                            );
                            Ok(completion)
                        }
                        Err(err) => {
                            let classified = classify_provider(&err.kind);
                            debug!(attempt, error = %err, error_type = %classified.error_type, "Provider call failed");
                            metrics.record_error(call.provider, &call.model, classified.error_type);
                            Err(classified)
                        }
                    }
                }
            },
        )
        .await;

        match outcome {
            Ok(completion) => self.finish(&call, completion),
            Err(err) => {
                warn!(%capability, error_type = %err.error_type, message = %err.message, "Request failed");
                AiResponse::failure(err.message)
            }
        }
    }

    fn finish<T>(&self, call: &Call<'_>, completion: Completion<T>) -> AiResponse<T>
    where
        T: Serialize + Default + PartialEq,
    {
        let Completion {
            content,
            usage,
            model,
        } = completion;

        if let Some(usage) = &usage {
            LlmMetrics::get().record_tokens(&model, usage);
            if call.record_cost {
                self.costs
                    .track_cost(call.capability.as_ref(), &model, *usage);
            }
        }

        if call.options.use_cache() && content != T::default() {
            match serde_json::to_string(&content) {
                Ok(serialized) => {
                    let ttl = call.options.cache_ttl_or(self.default_cache_ttl);
                    self.cache.set(&call.cache_key, &serialized, ttl);
                }
                Err(e) => warn!(error = %e, "Response could not be serialized for caching"),
            }
        }

        AiResponse::success(content, usage)
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(key, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }
}

fn timed_out(limit: Duration) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Timeout(format!(
        "no response within {} ms",
        limit.as_millis()
    )))
}
