//! # jass-gpt
//!
//! Chat runtime for the JASS GPT widget: a thin proxy in front of a language-model
//! completion API, and a rule-based responder that answers offline whenever the
//! remote path is disabled or fails.
//!
//! ## Overview
//!
//! Every user message goes through a [`FallbackOrchestrator`]. It makes at most one
//! call through a [`CompletionBackend`] (normally the [`ProxyClient`]); on success
//! the remote text is delivered verbatim, on any failure the [`FallbackResponder`]
//! produces a canned reply. Remote failure kinds are logged and never shown to the user.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jass_gpt::{ClientConfig, FallbackOrchestrator, ProxyClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> jass_gpt::Result<()> {
//!     let client = ProxyClient::new(ClientConfig::from_env()?)?;
//!     let mut orchestrator = FallbackOrchestrator::with_backend(Some(Arc::new(client)));
//!
//!     let reply = orchestrator.respond("What's the weather?").await;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fallback`] | Catalog, classifier, arithmetic evaluator, reply selector |
//! | [`client`] | Proxy client and remote failure taxonomy |
//! | [`orchestrator`] | Remote-or-fallback decision per message |
//! | [`session`] | Conversation driver and presentation sink |
//! | [`proxy`] | Axum server forwarding to the upstream API |
//! | [`config`] | Env-overridable settings |

pub mod client;
pub mod config;
pub mod fallback;
pub mod orchestrator;
pub mod proxy;
pub mod session;

// Re-export main types for convenience
pub use client::{CompletionBackend, CompletionRequest, CompletionResult, FailureKind, ProxyClient};
pub use config::{ClientConfig, ProxyConfig};
pub use fallback::{Category, FallbackResponder, ResponseCatalog, ResponseSelector};
pub use orchestrator::{FallbackOrchestrator, OrchestratorState, Reply, ReplySource};
pub use session::{ChatSession, ConsoleSink, PresentationSink};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
