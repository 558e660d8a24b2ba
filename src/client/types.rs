use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub message: String,
}

impl CompletionRequest {
    /// Blank input never becomes a request.
    pub fn new(message: impl AsRef<str>) -> Result<Self> {
        let message = message.as_ref().trim();
        if message.is_empty() {
            return Err(Error::validation_with_context(
                "message is required",
                ErrorContext::new()
                    .with_field_path("request.message")
                    .with_source("completion_request"),
            ));
        }
        Ok(Self {
            message: message.to_string(),
        })
    }
}

/// Why a remote completion did not produce text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    RateLimited,
    ServerError(String),
    MalformedResponse,
    /// No HTTP exchange happened at all (connect failure, timeout).
    Unreachable,
}

impl FailureKind {
    /// True when the proxy could not be reached, as opposed to answering with an error.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FailureKind::Unreachable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::ServerError(_) => "server_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::Unreachable => "unreachable",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::ServerError(detail) => write!(f, "server_error: {}", detail),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Success { text: String },
    Failure { kind: FailureKind },
}

impl CompletionResult {
    pub fn success(text: impl Into<String>) -> Self {
        CompletionResult::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind) -> Self {
        CompletionResult::Failure { kind }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }
}

/// Anything that can turn one user message into a completion.
///
/// Implementations must not panic or return errors; every problem is a [`FailureKind`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, message: &str) -> CompletionResult;
}

/// Success payload of `POST /api/chat`.
///
/// Fields are optional on the way in so a partial payload can be reported as malformed
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSuccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatSuccess {
    pub fn new(response: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            response: Some(response.into()),
            model: Some(model.into()),
        }
    }

    /// The reply text, if the payload is a well-formed success.
    pub fn into_text(self) -> Option<String> {
        match (self.success, self.response) {
            (Some(true), Some(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Error payload returned by the proxy with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorPayload {
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// `GET /api/health` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub openai_configured: bool,
}

/// `GET /api/test` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
