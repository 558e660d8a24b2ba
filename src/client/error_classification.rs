//! Error classification logic

use super::types::{ErrorPayload, FailureKind};

const GENERIC_SERVER_ERROR: &str = "Internal error";

/// Map a non-success HTTP status (plus whatever error payload could be parsed) to a failure.
///
/// - 401 => `Unauthorized`
/// - 429 => `RateLimited`
/// - 5xx => `ServerError` carrying the payload's `message`, then its `error`, then a generic text
/// - anything else => `ServerError("HTTP <status>")`
pub fn classify_status(status: u16, payload: &ErrorPayload) -> FailureKind {
    match status {
        401 => FailureKind::Unauthorized,
        429 => FailureKind::RateLimited,
        500..=599 => FailureKind::ServerError(
            payload
                .message
                .clone()
                .or_else(|| payload.error.clone())
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
        ),
        other => FailureKind::ServerError(format!("HTTP {}", other)),
    }
}

/// Map an error raised while sending the request.
///
/// Any failure before a response status arrives counts as the proxy being unreachable;
/// a body that fails to decode after a success status is a malformed response.
pub fn classify_transport(err: &reqwest::Error) -> FailureKind {
    if err.is_decode() || err.is_body() {
        return FailureKind::MalformedResponse;
    }
    if err.is_timeout() {
        tracing::warn!("Completion request timed out: {}", err);
    } else if err.is_connect() {
        tracing::warn!("Could not connect to completion proxy: {}", err);
    } else {
        tracing::warn!("Completion request failed before a response: {}", err);
    }
    FailureKind::Unreachable
}
