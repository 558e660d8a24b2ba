//! Client for the upstream chat-completion API (OpenAI-compatible).

use crate::config::ProxyConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream API key is not configured")]
    MissingApiKey,

    #[error("upstream rejected the API key")]
    Unauthorized,

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("upstream API error: {0}")]
    Api(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `error.message` out of an OpenAI-style error body.
fn upstream_error_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Forwards single-message completions upstream with the configured persona and parameters.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    config: Arc<ProxyConfig>,
}

impl UpstreamClient {
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.parameters.model
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.config.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)
    }

    /// System prompt plus the one user message; no history is forwarded.
    pub async fn complete(&self, message: &str) -> Result<String, UpstreamError> {
        let params = &self.config.parameters;
        let body = ChatCompletionRequest {
            model: &params.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        };

        let response = self
            .client
            .post(self.config.upstream_endpoint("/chat/completions"))
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);
            tracing::error!("OpenAI API Error (HTTP {}): {}", status, error_body);
            return Err(match status {
                401 => UpstreamError::Unauthorized,
                429 => UpstreamError::RateLimited,
                _ => UpstreamError::Api(
                    upstream_error_message(&error_body).unwrap_or_else(|| "Unknown error".to_string()),
                ),
            });
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| UpstreamError::Malformed("no choices[0].message.content".to_string()))
    }

    /// Connectivity probe: `GET /models`.
    pub async fn list_models(&self) -> Result<(), UpstreamError> {
        let response = self
            .client
            .get(self.config.upstream_endpoint("/models"))
            .bearer_auth(self.api_key()?)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(UpstreamError::Status(response.status().as_u16()))
        }
    }
}
