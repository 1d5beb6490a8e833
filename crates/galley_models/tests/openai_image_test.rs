//! OpenAI Images client and vendor fallback against local mock servers.

use base64::{Engine, engine::general_purpose::STANDARD};
use galley_core::ImageRequest;
use galley_error::ProviderErrorKind;
use galley_interface::ImageProvider;
use galley_models::{FallbackImageClient, HuggingFaceImageClient, OpenAIImageClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn openai(server: &MockServer) -> OpenAIImageClient {
    OpenAIImageClient::new("sk-test")
        .unwrap()
        .with_endpoint(format!("{}/v1/images/generations", server.uri()))
}

fn request() -> ImageRequest {
    ImageRequest {
        prompt: "Deconstructed lemon tart".to_string(),
        model: None,
    }
}

#[tokio::test]
async fn test_b64_json_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "prompt": "Deconstructed lemon tart",
            "response_format": "b64_json"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"b64_json": STANDARD.encode(JPEG)}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = openai(&server).generate_image(&request()).await.unwrap();

    assert_eq!(completion.content.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(
        completion.content.image_url,
        format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG))
    );
}

#[tokio::test]
async fn test_malformed_base64_is_a_hard_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"b64_json": "%%%"}]})),
        )
        .mount(&server)
        .await;

    let err = openai(&server).generate_image(&request()).await.unwrap_err();
    assert!(matches!(err.kind, ProviderErrorKind::InvalidImage(_)));
}

#[tokio::test]
async fn test_empty_data_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = openai(&server).generate_image(&request()).await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
}

#[tokio::test]
async fn test_huggingface_outage_falls_back_to_openai() {
    let hf = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "CUDA out of memory"})))
        .expect(1)
        .mount(&hf)
        .await;

    let oa = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"prompt": "Deconstructed lemon tart"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"b64_json": STANDARD.encode(JPEG)}]
        })))
        .expect(1)
        .mount(&oa)
        .await;

    let primary = HuggingFaceImageClient::new("hf_test", "stabilityai/stable-diffusion-xl-base-1.0")
        .unwrap()
        .with_base_url(format!("{}/models", hf.uri()));
    let client = FallbackImageClient::new(Arc::new(primary)).with_fallback(Arc::new(openai(&oa)));

    let completion = client.generate_image(&request()).await.unwrap();
    assert!(completion.content.image_url.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_fallback_uses_its_own_model_when_primary_model_is_overridden() {
    let hf = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/stabilityai/sdxl-turbo"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "CUDA out of memory"})))
        .expect(1)
        .mount(&hf)
        .await;

    let oa = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "prompt": "Deconstructed lemon tart",
            "model": "dall-e-3"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"b64_json": STANDARD.encode(JPEG)}]
        })))
        .expect(1)
        .mount(&oa)
        .await;

    let primary = HuggingFaceImageClient::new("hf_test", "stabilityai/stable-diffusion-xl-base-1.0")
        .unwrap()
        .with_base_url(format!("{}/models", hf.uri()));
    let client = FallbackImageClient::new(Arc::new(primary)).with_fallback(Arc::new(openai(&oa)));
    let request = ImageRequest {
        prompt: "Deconstructed lemon tart".to_string(),
        model: Some("stabilityai/sdxl-turbo".to_string()),
    };

    let completion = client.generate_image(&request).await.unwrap();
    assert_eq!(completion.model, "dall-e-3");
    assert!(completion.content.image_url.starts_with("data:image/jpeg;base64,"));
}
