//! Proxy routes against a mocked upstream API

use crate::integration::mock_server::{upstream_completion_body, MockServerFixture};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jass_gpt::config::ProxyConfig;
use jass_gpt::proxy;
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn call(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_chat_forwards_single_message_with_parameters() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 200,
                "temperature": 0.7,
                "frequency_penalty": 0.5,
                "presence_penalty": 0.3
            })),
            Matcher::Regex(r#"\{"role":"system","content":"You are JASS GPT"#.to_string()),
            Matcher::Regex(r#"\{"role":"user","content":"Tell me a joke"\}"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream_completion_body("  Why did the crab cross the road?  "))
        .create_async()
        .await;

    let router = proxy::router(fixture.proxy_config()).unwrap();
    let (status, body) = call(router, chat_request(json!({"message": "Tell me a joke"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "response": "Why did the crab cross the road?",
            "model": "gpt-3.5-turbo"
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_requires_message() {
    let fixture = MockServerFixture::new().await;
    for request_body in [json!({}), json!({"message": ""}), json!({"message": "   "})] {
        let router = proxy::router(fixture.proxy_config()).unwrap();
        let (status, body) = call(router, chat_request(request_body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message is required"}));
    }
}

#[tokio::test]
async fn test_chat_maps_upstream_errors() {
    let cases = [
        (
            401,
            r#"{"error":{"message":"bad key"}}"#,
            StatusCode::UNAUTHORIZED,
            json!({"error": "Invalid OpenAI API key"}),
        ),
        (
            429,
            r#"{"error":{"message":"slow down"}}"#,
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": "Rate limit exceeded. Please try again later."}),
        ),
        (
            503,
            r#"{"error":{"message":"The engine is currently overloaded"}}"#,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "OpenAI API error: The engine is currently overloaded"}),
        ),
        (
            500,
            "{}",
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "OpenAI API error: Unknown error"}),
        ),
    ];

    for (upstream_status, upstream_body, expected_status, expected_body) in cases {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture
            .mock_upstream_completion(upstream_status, upstream_body)
            .await;
        let router = proxy::router(fixture.proxy_config()).unwrap();
        let (status, body) = call(router, chat_request(json!({"message": "hi"}))).await;
        assert_eq!(status, expected_status, "upstream {}", upstream_status);
        assert_eq!(body, expected_body, "upstream {}", upstream_status);
    }
}

#[tokio::test]
async fn test_chat_malformed_upstream_is_internal_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_upstream_completion(200, r#"{"choices":[]}"#)
        .await;
    let router = proxy::router(fixture.proxy_config()).unwrap();
    let (status, body) = call(router, chat_request(json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_health_reports_configuration() {
    let fixture = MockServerFixture::new().await;
    let router = proxy::router(fixture.proxy_config()).unwrap();
    let (status, body) = call(router, get_request("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["openai_configured"], true);
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    let unconfigured = Arc::new(ProxyConfig::new(None).unwrap());
    let router = proxy::router(unconfigured).unwrap();
    let (_, body) = call(router, get_request("/api/health")).await;
    assert_eq!(body["openai_configured"], false);
}

#[tokio::test]
async fn test_connectivity_probe() {
    let mut fixture = MockServerFixture::new().await;
    let _ok = fixture.mock_upstream_models(200).await;
    let router = proxy::router(fixture.proxy_config()).unwrap();
    let (status, body) = call(router, get_request("/api/test")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OpenAI API connection successful"}));

    let mut fixture = MockServerFixture::new().await;
    let _denied = fixture.mock_upstream_models(401).await;
    let router = proxy::router(fixture.proxy_config()).unwrap();
    let (status, body) = call(router, get_request("/api/test")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"status": "OpenAI API connection failed", "code": 401})
    );
}
