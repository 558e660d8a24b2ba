//! `/api/*` handlers.

use super::upstream::{UpstreamClient, UpstreamError};
use crate::client::{ChatSuccess, ConnectivityStatus, ErrorPayload, HealthStatus};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

pub type AppStateArc = Arc<AppState>;

/// Shared, read-only handler state.
pub struct AppState {
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: Option<String>,
}

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/test", get(connectivity_test))
}

fn error_response(status: StatusCode, payload: ErrorPayload) -> Response {
    (status, Json(payload)).into_response()
}

async fn chat(
    State(state): State<AppStateArc>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let message = body
        .ok()
        .and_then(|Json(b)| b.message)
        .filter(|m| !m.trim().is_empty());
    let Some(message) = message else {
        return error_response(StatusCode::BAD_REQUEST, ErrorPayload::error("Message is required"));
    };

    info!("Received message: {}", message);

    match state.upstream.complete(&message).await {
        Ok(text) => {
            info!("AI Response: {}", text);
            Json(ChatSuccess::new(text, state.upstream.model())).into_response()
        }
        Err(UpstreamError::Unauthorized) => {
            error_response(StatusCode::UNAUTHORIZED, ErrorPayload::error("Invalid OpenAI API key"))
        }
        Err(UpstreamError::RateLimited) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorPayload::error("Rate limit exceeded. Please try again later."),
        ),
        Err(UpstreamError::Api(detail)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorPayload::error(format!("OpenAI API error: {}", detail)),
        ),
        Err(e) => {
            error!("Server Error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPayload::error("Internal server error").with_message(e.to_string()),
            )
        }
    }
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "online".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        openai_configured: state.upstream.config().is_configured(),
    })
}

async fn connectivity_test(State(state): State<AppStateArc>) -> Response {
    match state.upstream.list_models().await {
        Ok(()) => Json(ConnectivityStatus {
            status: "OpenAI API connection successful".to_string(),
            code: None,
            error: None,
        })
        .into_response(),
        Err(UpstreamError::Status(code)) => (
            StatusCode::BAD_REQUEST,
            Json(ConnectivityStatus {
                status: "OpenAI API connection failed".to_string(),
                code: Some(code),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ConnectivityStatus {
                status: "Test failed".to_string(),
                code: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
