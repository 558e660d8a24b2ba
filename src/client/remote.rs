use super::error_classification::{classify_status, classify_transport};
use super::types::{
    ChatSuccess, CompletionBackend, CompletionRequest, CompletionResult, ConnectivityStatus,
    ErrorPayload, FailureKind, HealthStatus,
};
use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;

/// Talks to the proxy's `/api/*` endpoints.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ProxyClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_chat(&self, request: &CompletionRequest) -> CompletionResult {
        let request_id = uuid::Uuid::new_v4().to_string();
        let url = self.config.endpoint("/api/chat");
        tracing::debug!("POST {} (request id {})", url, request_id);

        let response = match self
            .client
            .post(&url)
            .header("x-request-id", request_id.as_str())
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return CompletionResult::failure(classify_transport(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best effort; an unreadable one counts as empty.
            let payload = response.json::<ErrorPayload>().await.unwrap_or_default();
            let kind = classify_status(status.as_u16(), &payload);
            tracing::warn!("Proxy answered HTTP {}: {}", status.as_u16(), kind);
            return CompletionResult::failure(kind);
        }

        match response.json::<ChatSuccess>().await {
            Ok(body) => match body.into_text() {
                Some(text) => CompletionResult::success(text),
                None => {
                    tracing::warn!("Proxy success payload missing success flag or response text");
                    CompletionResult::failure(FailureKind::MalformedResponse)
                }
            },
            Err(e) => {
                tracing::warn!("Proxy success payload is not valid JSON: {}", e);
                CompletionResult::failure(FailureKind::MalformedResponse)
            }
        }
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let status = self
            .client
            .get(self.config.endpoint("/api/health"))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;
        Ok(status)
    }

    /// `GET /api/test`. Failure statuses still carry a [`ConnectivityStatus`] body.
    pub async fn test_connection(&self) -> Result<ConnectivityStatus> {
        let status = self
            .client
            .get(self.config.endpoint("/api/test"))
            .send()
            .await?
            .json::<ConnectivityStatus>()
            .await?;
        Ok(status)
    }
}

#[async_trait]
impl CompletionBackend for ProxyClient {
    async fn complete(&self, message: &str) -> CompletionResult {
        match CompletionRequest::new(message) {
            Ok(request) => self.post_chat(&request).await,
            Err(e) => {
                // Callers filter blank input first; treat a slip-through like a 400.
                tracing::warn!("Refusing to send completion request: {}", e);
                CompletionResult::failure(FailureKind::ServerError("HTTP 400".to_string()))
            }
        }
    }
}
