//! Relay stream with assistant-reply capture.
//!
//! [`RelayStream`] forwards provider fragments to the caller while
//! accumulating them into one assistant message. When the stream terminates
//! for any reason (exhaustion, a mid-stream provider error, or the caller
//! dropping the stream early) the accumulated text is persisted to the
//! session store exactly once, best effort.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures_util::Stream;
use tracing::warn;

use courier_types::chat::{ChatMessage, MessageRole};
use courier_types::error::ProviderError;

use crate::provider::adapter::FragmentStream;
use crate::store::SessionHistoryStore;

/// Persists whatever was forwarded so far, exactly once.
///
/// The persistence write is spawned onto the current runtime rather than
/// awaited: `finish` is reachable from `Drop`, which cannot block. If no
/// runtime is available (pure sync teardown in tests without a reactor)
/// the capture is lost and a warning is logged.
struct CaptureGuard<S: SessionHistoryStore + 'static> {
    store: Arc<S>,
    session_id: String,
    captured: String,
    armed: bool,
}

impl<S: SessionHistoryStore + 'static> CaptureGuard<S> {
    fn new(store: Arc<S>, session_id: String) -> Self {
        Self {
            store,
            session_id,
            captured: String::new(),
            armed: true,
        }
    }

    fn push(&mut self, fragment: &str) {
        self.captured.push_str(fragment);
    }

    fn finish(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if self.captured.is_empty() {
            return;
        }
        let store = Arc::clone(&self.store);
        let session_id = std::mem::take(&mut self.session_id);
        let content = std::mem::take(&mut self.captured);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let message = ChatMessage::new(MessageRole::Assistant, content);
                    if let Err(error) = store.append(&session_id, &message).await {
                        warn!(%session_id, %error, "failed to persist assistant reply");
                    }
                });
            }
            Err(_) => {
                warn!(%session_id, "no runtime available, assistant reply not persisted");
            }
        }
    }
}

impl<S: SessionHistoryStore + 'static> Drop for CaptureGuard<S> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// The fragment stream handed back to the HTTP layer.
///
/// Empty fragments are filtered out before they reach the caller or the
/// capture buffer. After the first error is yielded the stream ends.
pub struct RelayStream<S: SessionHistoryStore + 'static> {
    inner: FragmentStream,
    pending: Option<String>,
    guard: CaptureGuard<S>,
    done: bool,
}

impl<S: SessionHistoryStore + 'static> RelayStream<S> {
    pub(crate) fn new(
        inner: FragmentStream,
        pending: Option<String>,
        store: Arc<S>,
        session_id: String,
    ) -> Self {
        Self {
            inner,
            pending,
            guard: CaptureGuard::new(store, session_id),
            done: false,
        }
    }
}

impl<S: SessionHistoryStore + 'static> Stream for RelayStream<S> {
    type Item = Result<String, ProviderError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if let Some(fragment) = this.pending.take() {
            this.guard.push(&fragment);
            return Poll::Ready(Some(Ok(fragment)));
        }
        loop {
            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(fragment)) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    this.guard.push(&fragment);
                    return Poll::Ready(Some(Ok(fragment)));
                }
                Some(Err(error)) => {
                    this.done = true;
                    this.guard.finish();
                    return Poll::Ready(Some(Err(error)));
                }
                None => {
                    this.done = true;
                    this.guard.finish();
                    return Poll::Ready(None);
                }
            }
        }
    }
}
