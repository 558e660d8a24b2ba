//! One conversation: input validation, presentation, and stale-reply suppression.

use crate::orchestrator::{FallbackOrchestrator, Reply};
use rand::rngs::StdRng;
use rand::Rng;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Where finished turns are rendered.
pub trait PresentationSink: Send {
    /// Append a turn and scroll to it.
    fn append(&mut self, text: &str, is_user: bool);

    /// Show the transient "typing" marker.
    fn show_typing(&mut self);

    /// Remove the typing marker.
    fn hide_typing(&mut self);
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A single chat conversation.
///
/// Nothing is shared between sessions. Within a session a new submission cancels the
/// previous in-flight one, whose reply is then dropped instead of rendered.
pub struct ChatSession<S, R = StdRng> {
    orchestrator: tokio::sync::Mutex<FallbackOrchestrator<R>>,
    sink: Mutex<S>,
    in_flight: Mutex<Option<(u64, CancellationToken)>>,
    submissions: AtomicU64,
}

impl<S: PresentationSink, R: Rng + Send> ChatSession<S, R> {
    pub fn new(orchestrator: FallbackOrchestrator<R>, sink: S) -> Self {
        Self {
            orchestrator: tokio::sync::Mutex::new(orchestrator),
            sink: Mutex::new(sink),
            in_flight: Mutex::new(None),
            submissions: AtomicU64::new(0),
        }
    }

    /// Submit user input.
    ///
    /// Blank input is ignored (`None`, nothing rendered). Otherwise the user turn is
    /// rendered, the typing marker shown, and the reply rendered unless this submission
    /// was superseded or cancelled meanwhile. The marker is removed exactly once.
    pub async fn submit(&self, input: &str) -> Option<Reply> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        let id = self.submissions.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        if let Some((_, previous)) = lock(&self.in_flight).replace((id, token.clone())) {
            previous.cancel();
        }

        {
            let mut sink = lock(&self.sink);
            sink.append(message, true);
            sink.show_typing();
        }

        let reply = {
            let mut orchestrator = self.orchestrator.lock().await;
            if token.is_cancelled() {
                None
            } else {
                orchestrator.respond_with_cancel(message, &token).await
            }
        };

        {
            let mut in_flight = lock(&self.in_flight);
            if matches!(in_flight.as_ref(), Some((current, _)) if *current == id) {
                *in_flight = None;
            }
        }

        let mut sink = lock(&self.sink);
        sink.hide_typing();
        match reply {
            Some(reply) if !token.is_cancelled() => {
                sink.append(&reply.text, false);
                Some(reply)
            }
            _ => {
                tracing::debug!("Dropping reply for superseded submission");
                None
            }
        }
    }

    /// Cancel whatever submission is in flight (e.g. the UI is being torn down).
    pub fn cancel(&self) {
        if let Some((_, token)) = lock(&self.in_flight).take() {
            token.cancel();
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Renders turns as lines on a writer (stdout for the terminal widget).
///
/// There is a single typing marker, so the sink assumes one submission in flight at a
/// time: with overlapping submissions the superseded one clears the marker early.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    typing: bool,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, typing: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PresentationSink for ConsoleSink<W> {
    fn append(&mut self, text: &str, is_user: bool) {
        // The user's own line is already on screen when reading from a terminal.
        if is_user {
            return;
        }
        let _ = writeln!(self.out, "AI: {}", text);
        let _ = self.out.flush();
    }

    fn show_typing(&mut self) {
        if !self.typing {
            self.typing = true;
            let _ = write!(self.out, "AI is typing...");
            let _ = self.out.flush();
        }
    }

    fn hide_typing(&mut self) {
        if self.typing {
            self.typing = false;
            let _ = write!(self.out, "\r\x1b[2K");
            let _ = self.out.flush();
        }
    }
}
