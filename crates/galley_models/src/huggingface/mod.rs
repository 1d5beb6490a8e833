//! HuggingFace Inference API clients.

mod dto;
mod image;
mod text;

pub use image::HuggingFaceImageClient;
pub use text::{HuggingFaceTextClient, JSON_ONLY_INSTRUCTION, strip_code_fences};

use crate::http::{api_error, send_error};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Serverless inference base URL; the model id is appended.
pub const HUGGINGFACE_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Longest wait honored for a model warm-up.
pub const MAX_WARMUP_WAIT: Duration = Duration::from_secs(60);

/// Send a request, waiting out one model warm-up.
///
/// A `503` whose body carries `estimated_time` means the model is loading:
/// sleep for the estimate (capped at `max_wait`) and send once more. Any
/// other response is returned as-is for the caller to inspect.
pub(crate) async fn send_with_warmup<F, Fut>(max_wait: Duration, send: F) -> ProviderResult<Response>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let response = send().await.map_err(send_error)?;
    if response.status() != StatusCode::SERVICE_UNAVAILABLE {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let Some(estimate) = loading_estimate(&body) else {
        return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, &body));
    };

    let wait = warmup_wait(estimate, max_wait);
    warn!(
        estimated_secs = estimate,
        wait_ms = wait.as_millis() as u64,
        "Model is loading, retrying once"
    );
    tokio::time::sleep(wait).await;

    let retried = send().await.map_err(send_error)?;
    if retried.status() != StatusCode::SERVICE_UNAVAILABLE {
        return Ok(retried);
    }

    let body = retried.text().await.unwrap_or_default();
    match loading_estimate(&body) {
        Some(estimate) => Err(ProviderError::new(ProviderErrorKind::ModelLoading {
            estimated_secs: estimate.max(0.0).ceil() as u64,
        })),
        None => Err(api_error(StatusCode::SERVICE_UNAVAILABLE, &body)),
    }
}

fn loading_estimate(body: &str) -> Option<f64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("estimated_time")?
        .as_f64()
        .filter(|secs| secs.is_finite())
}

fn warmup_wait(estimate: f64, max_wait: Duration) -> Duration {
    Duration::from_secs_f64(estimate.clamp(0.0, max_wait.as_secs_f64()))
}

/// Reject blank credentials up front.
#[track_caller]
pub(crate) fn require_key(api_key: String) -> ProviderResult<String> {
    if api_key.trim().is_empty() {
        Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
            "HuggingFace".to_string(),
        )))
    } else {
        Ok(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_estimated_time() {
        assert_eq!(
            loading_estimate(r#"{"error":"Model is currently loading","estimated_time":20.5}"#),
            Some(20.5)
        );
        assert_eq!(loading_estimate(r#"{"error":"Service Unavailable"}"#), None);
        assert_eq!(loading_estimate("upstream connect error"), None);
    }

    #[test]
    fn warmup_wait_is_capped() {
        assert_eq!(warmup_wait(500.0, MAX_WARMUP_WAIT), MAX_WARMUP_WAIT);
        assert_eq!(warmup_wait(-3.0, MAX_WARMUP_WAIT), Duration::ZERO);
        assert_eq!(
            warmup_wait(1.5, MAX_WARMUP_WAIT),
            Duration::from_millis(1500)
        );
    }
}
