//! Chat-completions client against a local mock server.

use galley_core::{ChatRequest, ContentPart, ProviderMessage, ResponseFormat, Role, Usage};
use galley_error::{AiErrorType, ProviderErrorKind, classify};
use galley_interface::ChatProvider;
use galley_models::OpenAICompatibleClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenAICompatibleClient {
    OpenAICompatibleClient::openai("sk-test", "gpt-4o-mini")
        .unwrap()
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()))
}

fn request(text: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![ProviderMessage::text(Role::User, text)],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_completion_content_usage_and_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "Knife skills?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"role": "assistant", "content": "Claw grip."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = client(&server).complete(&request("Knife skills?")).await.unwrap();

    assert_eq!(completion.content, "Claw grip.");
    assert_eq!(completion.usage, Some(Usage::new(12, 3)));
    assert_eq!(completion.model, "gpt-4o-mini-2024-07-18");
}

#[tokio::test]
async fn test_json_mode_and_vision_parts_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "response_format": {"type": "json_object"},
            "max_tokens": 50,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "What is on this plate?"},
                    {"type": "image_url", "image_url": {"url": "https://img.example/plate.jpg"}}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"dish\":\"paella\"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest {
        messages: vec![ProviderMessage::parts(
            Role::User,
            vec![
                ContentPart::text("What is on this plate?"),
                ContentPart::image("https://img.example/plate.jpg"),
            ],
        )],
        max_tokens: Some(50),
        response_format: ResponseFormat::JsonObject,
        ..Default::default()
    };

    let completion = client(&server).complete(&request).await.unwrap();
    assert_eq!(completion.content, "{\"dish\":\"paella\"}");
    assert_eq!(completion.usage, None);
    assert_eq!(completion.model, "gpt-4o-mini");
}

#[tokio::test]
async fn test_rate_limited_status_classifies_as_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Slow down", "type": "requests"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).complete(&request("hi")).await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Api { status: 429, .. }));
    let classified = classify(&err.kind);
    assert_eq!(classified.error_type, AiErrorType::RateLimited);
    assert!(classified.retryable);
}

#[tokio::test]
async fn test_unauthorized_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect key provided"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).complete(&request("hi")).await.unwrap_err();
    let classified = classify(&err.kind);
    assert_eq!(classified.error_type, AiErrorType::ApiKeyMissing);
    assert!(!classified.retryable);
}

#[tokio::test]
async fn test_no_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server).complete(&request("hi")).await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind and release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = OpenAICompatibleClient::groq("gsk-test", "llama-3.1-8b-instant")
        .unwrap()
        .with_endpoint(format!("http://127.0.0.1:{}/openai/v1/chat/completions", port));
    let err = client.complete(&request("hi")).await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Network(_)));
    assert_eq!(classify(&err.kind).error_type, AiErrorType::NetworkError);
}

#[test]
fn test_blank_key_is_rejected() {
    let err = OpenAICompatibleClient::groq("", "llama-3.1-8b-instant").unwrap_err();
    assert_eq!(
        err.kind,
        ProviderErrorKind::MissingApiKey("Groq".to_string())
    );
    assert_eq!(classify(&err.kind).error_type, AiErrorType::ApiKeyMissing);
}
