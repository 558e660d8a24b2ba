//! ProxyClient against a mocked `/api/chat`

use crate::integration::mock_server::{spawn_silent_server, MockServerFixture};
use jass_gpt::client::{CompletionBackend, CompletionResult, FailureKind};
use jass_gpt::config::ClientConfig;
use jass_gpt::ProxyClient;
use mockito::Matcher;
use std::time::Duration;

#[tokio::test]
async fn test_success_payload() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Json(serde_json::json!({"message": "hello"})))
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"response":"Hi from upstream","model":"gpt-3.5-turbo"}"#)
        .create_async()
        .await;

    let result = fixture.proxy_client().complete("hello").await;
    assert_eq!(result, CompletionResult::success("Hi from upstream"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_classification() {
    let test_cases = vec![
        (401, r#"{"error":"Invalid OpenAI API key"}"#, FailureKind::Unauthorized),
        (
            429,
            r#"{"error":"Rate limit exceeded. Please try again later."}"#,
            FailureKind::RateLimited,
        ),
        (
            500,
            r#"{"error":"Internal server error","message":"upstream reset"}"#,
            FailureKind::ServerError("upstream reset".into()),
        ),
        (
            500,
            r#"{"error":"OpenAI API error: overloaded"}"#,
            FailureKind::ServerError("OpenAI API error: overloaded".into()),
        ),
        (503, "not json", FailureKind::ServerError("Internal error".into())),
        (
            400,
            r#"{"error":"Message is required"}"#,
            FailureKind::ServerError("HTTP 400".into()),
        ),
    ];

    for (status, body, expected) in test_cases {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_chat(status, body).await;
        let result = fixture.proxy_client().complete("hi").await;
        assert_eq!(
            result,
            CompletionResult::failure(expected),
            "status {} should be classified",
            status
        );
    }
}

#[tokio::test]
async fn test_malformed_success_payloads() {
    for body in [
        r#"{"response":"missing flag"}"#,
        r#"{"success":false,"response":"flag false"}"#,
        r#"{"success":true}"#,
        "<html>not json</html>",
    ] {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_chat(200, body).await;
        let result = fixture.proxy_client().complete("hi").await;
        assert_eq!(
            result,
            CompletionResult::failure(FailureKind::MalformedResponse),
            "body {}",
            body
        );
    }
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig::new(&format!("http://127.0.0.1:{}", port)).unwrap();
    let client = ProxyClient::new(config).unwrap();

    let result = client.complete("hi").await;
    assert_eq!(result, CompletionResult::failure(FailureKind::Unreachable));
}

#[tokio::test]
async fn test_unresponsive_proxy_times_out() {
    let url = spawn_silent_server().await;
    let config = ClientConfig::new(&url)
        .unwrap()
        .with_timeout(Duration::from_secs(1));
    let client = ProxyClient::new(config).unwrap();

    let started = std::time::Instant::now();
    let result = client.complete("hi").await;
    assert_eq!(result, CompletionResult::failure(FailureKind::Unreachable));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_health_and_connectivity_endpoints() {
    let mut fixture = MockServerFixture::new().await;
    let _health = fixture
        .server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"online","timestamp":"2024-01-01T00:00:00.000Z","openai_configured":true}"#)
        .create_async()
        .await;
    let _test = fixture
        .server
        .mock("GET", "/api/test")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"OpenAI API connection failed","code":401}"#)
        .create_async()
        .await;

    let client = fixture.proxy_client();
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "online");
    assert!(health.openai_configured);

    let connectivity = client.test_connection().await.unwrap();
    assert_eq!(connectivity.code, Some(401));
    assert_eq!(connectivity.status, "OpenAI API connection failed");
}
