//! Per-message control: try the remote path once, fall back on any failure.
//!
//! ```text
//! Idle -> AwaitingRemote -> Delivered   -> Idle
//!                        \-> FallingBack -> Idle
//! Idle -> FallingBack -> Idle            (remote disabled)
//! ```
//!
//! There is exactly one remote attempt per submission. A failed attempt is never
//! retried within the same submission; the fallback responder answers instead.

use crate::client::{CompletionBackend, CompletionResult, FailureKind};
use crate::fallback::{FallbackResponder, ResponseCatalog, ResponseSelector};
use rand::rngs::StdRng;
use rand::Rng;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Reply used only when the fallback path itself blows up.
pub const GENERIC_APOLOGY: &str = "Sorry, I couldn't process that. Try again!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    AwaitingRemote,
    Delivered,
    FallingBack,
}

impl OrchestratorState {
    pub fn can_transition_to(self, next: OrchestratorState) -> bool {
        use OrchestratorState::*;
        matches!(
            (self, next),
            (Idle, AwaitingRemote)
                | (Idle, FallingBack)
                | (AwaitingRemote, Delivered)
                | (AwaitingRemote, FallingBack)
                | (AwaitingRemote, Idle)
                | (Delivered, Idle)
                | (FallingBack, Idle)
        )
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    /// `None` when the remote path is disabled, otherwise the failure that triggered the fallback.
    Fallback(Option<FailureKind>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ReplySource::Fallback(_))
    }
}

/// Ties the remote client and the fallback responder together for one conversation.
pub struct FallbackOrchestrator<R = StdRng> {
    backend: Option<Arc<dyn CompletionBackend>>,
    responder: Arc<FallbackResponder>,
    selector: ResponseSelector<R>,
    state: OrchestratorState,
}

impl FallbackOrchestrator<StdRng> {
    /// Orchestrator with an entropy-seeded selector.
    pub fn with_backend(backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self::new(
            backend,
            Arc::new(FallbackResponder::default()),
            ResponseSelector::from_entropy(),
        )
    }
}

impl<R: Rng> FallbackOrchestrator<R> {
    /// `backend = None` disables the remote path; every message is answered offline.
    pub fn new(
        backend: Option<Arc<dyn CompletionBackend>>,
        responder: Arc<FallbackResponder>,
        selector: ResponseSelector<R>,
    ) -> Self {
        Self {
            backend,
            responder,
            selector,
            state: OrchestratorState::Idle,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn remote_enabled(&self) -> bool {
        self.backend.is_some()
    }

    fn transition(&mut self, next: OrchestratorState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!("orchestrator {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Produce a reply for `message`. Never fails.
    pub async fn respond(&mut self, message: &str) -> Reply {
        let never = CancellationToken::new();
        match self.respond_with_cancel(message, &never).await {
            Some(reply) => reply,
            // Unreachable without cancellation; keep the contract anyway.
            None => Reply {
                text: GENERIC_APOLOGY.to_string(),
                source: ReplySource::Fallback(None),
            },
        }
    }

    /// Like [`respond`](Self::respond) but abandons the remote call when `cancel` fires.
    ///
    /// Returns `None` if cancelled; the state is back to `Idle` either way.
    pub async fn respond_with_cancel(
        &mut self,
        message: &str,
        cancel: &CancellationToken,
    ) -> Option<Reply> {
        let Some(backend) = self.backend.clone() else {
            self.transition(OrchestratorState::FallingBack);
            let text = self.fallback_text(message);
            self.transition(OrchestratorState::Idle);
            return Some(Reply {
                text,
                source: ReplySource::Fallback(None),
            });
        };

        self.transition(OrchestratorState::AwaitingRemote);
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Remote completion cancelled; dropping stale call");
                self.transition(OrchestratorState::Idle);
                return None;
            }
            result = backend.complete(message) => result,
        };

        let reply = match result {
            CompletionResult::Success { text } => {
                self.transition(OrchestratorState::Delivered);
                Reply {
                    text,
                    source: ReplySource::Remote,
                }
            }
            CompletionResult::Failure { kind } => {
                if kind.is_connectivity() {
                    tracing::warn!("Backend offline, using fallback.");
                } else {
                    tracing::warn!("Remote completion failed ({}), using fallback.", kind);
                }
                self.transition(OrchestratorState::FallingBack);
                Reply {
                    text: self.fallback_text(message),
                    source: ReplySource::Fallback(Some(kind)),
                }
            }
        };

        self.transition(OrchestratorState::Idle);
        Some(reply)
    }

    fn fallback_text(&mut self, message: &str) -> String {
        let responder = &self.responder;
        let selector = &mut self.selector;
        let computed = catch_unwind(AssertUnwindSafe(|| {
            let catalog = ResponseCatalog::now();
            responder.respond(message, &catalog, selector)
        }));
        match computed {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => GENERIC_APOLOGY.to_string(),
            Err(_) => {
                tracing::error!("Fallback responder panicked");
                GENERIC_APOLOGY.to_string()
            }
        }
    }
}
