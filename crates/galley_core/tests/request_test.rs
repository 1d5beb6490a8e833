use galley_core::{
    ChatMessage, ContentPart, MessageContent, PlatingMethod, ProviderMessage, RequestOptions,
    ResponseFormat, Role,
};
use std::str::FromStr;
use std::time::Duration;

#[test]
fn vision_parts_serialize_to_chat_completions_shape() {
    let message = ProviderMessage::parts(
        Role::User,
        vec![
            ContentPart::text("What is on this plate?"),
            ContentPart::image("https://example.com/plate.jpg"),
        ],
    );

    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"][0]["type"], "text");
    assert_eq!(json["content"][1]["type"], "image_url");
    assert_eq!(
        json["content"][1]["image_url"]["url"],
        "https://example.com/plate.jpg"
    );
}

#[test]
fn text_content_serializes_as_plain_string() {
    let message = ProviderMessage::from(&ChatMessage::system("Be concise."));
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["content"], "Be concise.");
}

#[test]
fn message_content_text_skips_images() {
    let content = MessageContent::Parts(vec![
        ContentPart::text("first"),
        ContentPart::image("data:image/png;base64,AAAA"),
        ContentPart::text("second"),
    ]);
    assert_eq!(content.text(), "first\nsecond");
}

#[test]
fn cache_irrelevant_options_are_not_serialized() {
    let plain = RequestOptions::default().with_model("gpt-4o-mini");
    let with_extras = plain
        .clone()
        .with_timeout(Duration::from_secs(5))
        .with_caller_id("kitchen-7");

    assert_eq!(
        serde_json::to_string(&plain).unwrap(),
        serde_json::to_string(&with_extras).unwrap()
    );
}

#[test]
fn options_use_wire_names() {
    let options = RequestOptions::default()
        .with_cache_ttl(Duration::from_millis(1500))
        .with_response_format(ResponseFormat::JsonObject);
    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json["cacheTTL"], 1500);
    assert_eq!(json["responseFormat"]["type"], "json_object");
}

#[test]
fn plating_methods_parse_lowercase() {
    assert_eq!(
        PlatingMethod::from_str("deconstructed").unwrap(),
        PlatingMethod::Deconstructed
    );
    assert_eq!(PlatingMethod::Stacking.to_string(), "stacking");
}
