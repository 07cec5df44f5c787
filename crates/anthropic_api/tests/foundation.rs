use anthropic_api::error::parse_error_message;
use anthropic_api::retry::{is_retryable_http_error, retry_delay_ms};
use anthropic_api::{normalize_messages_url, AnthropicApiConfig, AnthropicClient, MessagesRequest};
use reqwest::StatusCode;
use serde_json::json;

#[test]
fn url_normalization() {
    assert_eq!(
        normalize_messages_url("https://api.anthropic.com"),
        "https://api.anthropic.com/v1/messages"
    );
    assert_eq!(
        normalize_messages_url("http://localhost:8080/v1/"),
        "http://localhost:8080/v1/messages"
    );
    assert_eq!(
        normalize_messages_url("http://proxy/v1/messages"),
        "http://proxy/v1/messages"
    );
    assert_eq!(normalize_messages_url("  "), "https://api.anthropic.com/v1/messages");
}

#[test]
fn retry_statuses_and_messages() {
    for status in [408, 429, 500, 502, 503, 504, 529] {
        assert!(is_retryable_http_error(status, ""), "status {status}");
    }
    assert!(!is_retryable_http_error(400, "invalid request"));
    assert!(is_retryable_http_error(400, "Overloaded"));
    assert_eq!(retry_delay_ms(0).as_millis(), 1000);
    assert_eq!(retry_delay_ms(2).as_millis(), 4000);
}

#[test]
fn error_messages_are_friendly() {
    let overloaded = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
    assert!(parse_error_message(StatusCode::from_u16(529).expect("status"), overloaded)
        .contains("overloaded right now"));

    let auth = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
    assert!(parse_error_message(StatusCode::UNAUTHORIZED, auth).contains("ANTHROPIC_API_KEY"));

    let invalid = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens: too large"}}"#;
    assert_eq!(
        parse_error_message(StatusCode::BAD_REQUEST, invalid),
        "max_tokens: too large"
    );

    assert_eq!(parse_error_message(StatusCode::BAD_GATEWAY, "upstream died"), "upstream died");
    assert_eq!(parse_error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
}

#[test]
fn request_payload_shape() {
    let request = MessagesRequest::new("claude-haiku", 256)
        .with_system("You are a JSON API.")
        .user("What is this project?")
        .assistant("{\"summary\": \"This looks like");

    assert_eq!(request.prefill(), Some("{\"summary\": \"This looks like"));
    assert_eq!(
        serde_json::to_value(&request).expect("serialize"),
        json!({
            "model": "claude-haiku",
            "max_tokens": 256,
            "system": "You are a JSON API.",
            "messages": [
                {"role": "user", "content": "What is this project?"},
                {"role": "assistant", "content": "{\"summary\": \"This looks like"}
            ]
        })
    );
}

#[test]
fn http_request_targets_messages_endpoint_with_headers() {
    let config = AnthropicApiConfig::new("sk-test").with_base_url("http://localhost:9/");
    let client = AnthropicClient::new(config).expect("client");
    let mut request = MessagesRequest::new("m", 16).user("hi");
    request.stream = true;

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(http_request.url().as_str(), "http://localhost:9/v1/messages");
    assert_eq!(http_request.method(), "POST");
    assert_eq!(http_request.headers()["x-api-key"], "sk-test");
    assert_eq!(http_request.headers()["anthropic-version"], "2023-06-01");
    assert_eq!(http_request.headers()["accept"], "text/event-stream");
}

#[test]
fn client_without_key_fails_at_request_time() {
    let client = AnthropicClient::new(AnthropicApiConfig::default()).expect("client");
    let err = client
        .build_request(&MessagesRequest::new("m", 16))
        .expect_err("missing key");
    assert_eq!(err.to_string(), "ANTHROPIC_API_KEY is required");
}
