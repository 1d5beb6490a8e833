//! Configuration loading and orchestrator wiring from settings.

use galley::{Capability, GalleyConfig, Orchestrator};
use galley_cost::ModelPrice;
use galley_models::AiSettings;
use std::io::Write;
use std::time::Duration;

fn settings(vars: &[(&'static str, &'static str)]) -> AiSettings {
    let vars = vars.to_vec();
    AiSettings::from_lookup(move |name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    })
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
kitchen_context = "Halal kitchen; no pork or alcohol."

[rate_limit]
max_requests = 5
window_ms = 60000

[retry]
max_attempts = 2

[pricing."gpt-4o-mini"]
input_per_million = 0.2
output_per_million = 0.8
"#,
    );

    let config = GalleyConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.rate_limit.window_ms, 60_000);
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.cache.default_ttl(), Duration::from_secs(3600));
    assert_eq!(
        config.kitchen_context.as_deref(),
        Some("Halal kitchen; no pork or alcohol.")
    );

    let prices = config.price_table();
    assert_eq!(prices.price_for("gpt-4o-mini"), ModelPrice::new(0.2, 0.8));
    assert_eq!(prices.price_for("gpt-4o"), ModelPrice::new(2.5, 10.0));
}

#[test]
fn zero_rate_limit_is_rejected() {
    let file = write_config(
        r#"
[rate_limit]
max_requests = 0
"#,
    );

    let err = GalleyConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("max_requests"));
}

#[test]
fn negative_price_is_rejected() {
    let file = write_config(
        r#"
[pricing."house-model"]
input_per_million = -1.0
output_per_million = 1.0
"#,
    );

    assert!(GalleyConfig::from_file(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(GalleyConfig::from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn use_groq_without_key_fails_construction() {
    let settings = settings(&[("USE_GROQ", "true"), ("OPENAI_API_KEY", "sk-test")]);
    let err = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap_err();
    assert!(err.to_string().contains("GROQ_API_KEY"));
}

#[test]
fn use_groq_with_key_configures_chat() {
    let settings = settings(&[("USE_GROQ", "yes"), ("GROQ_API_KEY", "gsk-test")]);
    let orchestrator = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap();
    assert!(orchestrator.is_available(Capability::Chat));
    assert!(orchestrator.is_available(Capability::GroqText));
    assert!(!orchestrator.is_available(Capability::Vision));
    assert!(!orchestrator.is_available(Capability::Image));
}

#[test]
fn openai_key_enables_chat_vision_and_images() {
    let settings = settings(&[("OPENAI_API_KEY", "sk-test")]);
    let orchestrator = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap();
    assert!(orchestrator.is_available(Capability::Chat));
    assert!(orchestrator.is_available(Capability::Vision));
    assert!(orchestrator.is_available(Capability::Image));
    assert!(!orchestrator.is_available(Capability::GroqText));
    assert!(!orchestrator.is_available(Capability::HuggingfaceText));
}

#[test]
fn huggingface_key_alone_serves_vision_images_and_text() {
    let settings = settings(&[("HUGGINGFACE_API_KEY", "hf-test")]);
    let orchestrator = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap();
    assert!(!orchestrator.is_available(Capability::Chat));
    assert!(orchestrator.is_available(Capability::Vision));
    assert!(orchestrator.is_available(Capability::Image));
    assert!(orchestrator.is_available(Capability::HuggingfaceText));
}

#[test]
fn master_switch_off_disables_everything() {
    let settings = settings(&[("AI_ENABLED", "0"), ("OPENAI_API_KEY", "sk-test")]);
    let orchestrator = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap();
    assert!(!orchestrator.is_available(Capability::Chat));
    assert!(!orchestrator.is_available(Capability::Image));
}

#[tokio::test]
async fn disabled_orchestrator_answers_with_an_error_envelope() {
    let settings = settings(&[("AI_ENABLED", "off")]);
    let orchestrator = Orchestrator::from_settings(&settings, &GalleyConfig::default()).unwrap();

    let response = orchestrator
        .generate_text_with_groq("hello", &galley::RequestOptions::default())
        .await;
    assert_eq!(response.error.as_deref(), Some(galley::DISABLED_MESSAGE));
}
