//! Remote completion client.
//!
//! Keep the public surface small: one request type, one result type, one trait
//! for anything that can produce completions. Implementation details live under
//! `src/client/`.

pub mod error_classification;
pub mod remote;
pub mod types;

pub use error_classification::{classify_status, classify_transport};
pub use remote::ProxyClient;
pub use types::{
    ChatSuccess, CompletionBackend, CompletionRequest, CompletionResult, ConnectivityStatus,
    ErrorPayload, FailureKind, HealthStatus,
};
