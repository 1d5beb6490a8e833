//! Mapping HTTP failures onto provider errors.

use galley_error::{ProviderError, ProviderErrorKind};
use reqwest::{Response, StatusCode};
use tracing::error;

/// Longest error body carried into an error message.
const MAX_ERROR_BODY: usize = 500;

/// Convert a transport failure.
#[track_caller]
pub(crate) fn send_error(error: reqwest::Error) -> ProviderError {
    error!(error = ?error, "HTTP request failed");
    if error.is_timeout() {
        ProviderError::new(ProviderErrorKind::Timeout(error.to_string()))
    } else {
        ProviderError::new(ProviderErrorKind::Network(error.to_string()))
    }
}

/// Convert a non-success response, consuming its body.
pub(crate) async fn status_error(response: Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(status = %status, error = %body, "API error");
    api_error(status, &body)
}

/// Build an API error from a status and raw body.
///
/// JSON bodies of the form `{"error": {"message": ...}}` or `{"error": ...}`
/// contribute only their message.
#[track_caller]
pub(crate) fn api_error(status: StatusCode, body: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Api {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message: error_message(body),
    })
}

fn error_message(body: &str) -> String {
    let extracted = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .map(str::to_string)
        });

    let message = extracted.unwrap_or_else(|| body.trim().to_string());
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &message[..end])
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_openai_message() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        );
        assert_eq!(
            err.message(),
            "HTTP 401 Unauthorized: Incorrect API key provided"
        );
    }

    #[test]
    fn extracts_flat_huggingface_message() {
        let err = api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":"Model is overloaded"}"#,
        );
        assert_eq!(
            err.message(),
            "HTTP 503 Service Unavailable: Model is overloaded"
        );
    }

    #[test]
    fn truncates_long_bodies() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, &"é".repeat(400));
        assert!(err.message().ends_with("..."));
        assert!(err.message().len() < 600);
    }
}
