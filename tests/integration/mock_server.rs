//! Mock HTTP server setup for integration tests

use jass_gpt::config::{ClientConfig, ProxyConfig};
use jass_gpt::ProxyClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Proxy client pointed at the mock server
    pub fn proxy_client(&self) -> ProxyClient {
        let config = ClientConfig::new(&self.base_url)
            .expect("valid mock url")
            .with_timeout(Duration::from_secs(5));
        ProxyClient::new(config).expect("client builds")
    }

    /// Proxy config whose upstream is the mock server
    pub fn proxy_config(&self) -> Arc<ProxyConfig> {
        let config = ProxyConfig::new(Some("test-key".to_string()))
            .expect("default proxy config")
            .with_upstream_base_url(&self.base_url)
            .expect("valid mock url");
        Arc::new(config)
    }

    /// Mock `POST /api/chat` with a fixed status and body
    pub async fn mock_chat(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/api/chat")
            .match_header("content-type", Matcher::Regex("application/json".into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock an upstream `POST /chat/completions` returning `body`
    pub async fn mock_upstream_completion(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock an upstream `GET /models`
    pub async fn mock_upstream_models(&mut self, status: usize) -> Mock {
        self.server
            .mock("GET", "/models")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await
    }
}

/// OpenAI-style completion body with one choice
pub fn upstream_completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

/// Serve `router` on an ephemeral local port; returns its base URL.
pub async fn spawn_router(router: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// A listener that accepts connections and never answers.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}
