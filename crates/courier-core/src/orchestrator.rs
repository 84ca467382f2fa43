//! Chat exchange orchestration.
//!
//! One `run` call performs one full exchange: persist the inbound messages,
//! read recent history, assemble the provider payload, pick a provider from
//! the rotation, and hand back a stream that captures the reply as it is
//! forwarded. Store failures degrade the exchange; provider failures before
//! any output, or an empty provider roster, abort it.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, warn};

use courier_types::chat::ChatMessage;
use courier_types::error::RelayError;
use courier_types::llm::{GenerationParams, GenerationRequest};

use crate::history::HistoryAssembler;
use crate::provider::pool::ProviderPool;
use crate::store::SessionHistoryStore;
use crate::stream::RelayStream;

pub struct ChatOrchestrator<S: SessionHistoryStore + 'static> {
    store: Arc<S>,
    pool: Arc<ProviderPool>,
    assembler: HistoryAssembler,
    history_window: u32,
    params: GenerationParams,
}

impl<S: SessionHistoryStore + 'static> ChatOrchestrator<S> {
    pub fn new(
        store: Arc<S>,
        pool: Arc<ProviderPool>,
        assembler: HistoryAssembler,
        history_window: u32,
        params: GenerationParams,
    ) -> Self {
        Self {
            store,
            pool,
            assembler,
            history_window,
            params,
        }
    }

    /// Run one exchange against the session.
    ///
    /// Returns a live fragment stream. The assistant reply is persisted when
    /// the stream terminates, however that happens; see [`RelayStream`].
    pub async fn run(
        &self,
        session_id: &str,
        new_messages: Vec<ChatMessage>,
        instruction: Option<&str>,
        context: Option<&str>,
    ) -> Result<RelayStream<S>, RelayError> {
        // Inbound persistence happens before the history read so the read
        // already reflects this call's messages. Failures degrade to an
        // unpersisted exchange rather than aborting it.
        for message in &new_messages {
            if let Err(error) = self.store.append(session_id, message).await {
                warn!(%session_id, %error, "failed to persist inbound message");
            }
        }

        let persisted = match self.store.recent(session_id, self.history_window).await {
            Ok(messages) => messages,
            Err(error) => {
                warn!(%session_id, %error, "history read failed, using submitted messages");
                Vec::new()
            }
        };

        let messages = self
            .assembler
            .assemble(persisted, &new_messages, instruction, context);

        let adapter = self.pool.select_next().ok_or(RelayError::NoProvider)?;
        debug!(%session_id, provider = adapter.name(), "dispatching exchange");

        let mut inner = adapter.generate(GenerationRequest {
            messages,
            params: self.params.clone(),
        });

        // Pull until the first non-empty fragment so a provider that fails
        // before producing output surfaces as a fatal error instead of an
        // in-stream one.
        let pending = loop {
            match inner.next().await {
                Some(Ok(fragment)) if fragment.is_empty() => continue,
                Some(Ok(fragment)) => break Some(fragment),
                Some(Err(error)) => return Err(RelayError::Provider(error)),
                None => break None,
            }
        };

        Ok(RelayStream::new(
            inner,
            pending,
            Arc::clone(&self.store),
            session_id.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use courier_types::chat::MessageRole;
    use courier_types::error::{ProviderError, StoreError};

    use crate::provider::adapter::{FragmentStream, ProviderAdapter};

    struct TestStore {
        appended: Mutex<Vec<(String, ChatMessage)>>,
        fail_append: AtomicBool,
        fail_recent: AtomicBool,
    }

    impl TestStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                appended: Mutex::new(Vec::new()),
                fail_append: AtomicBool::new(false),
                fail_recent: AtomicBool::new(false),
            })
        }

        fn appended(&self) -> Vec<(String, ChatMessage)> {
            self.appended.lock().unwrap().clone()
        }
    }

    impl SessionHistoryStore for TestStore {
        async fn append(&self, session_id: &str, message: &ChatMessage) -> Result<(), StoreError> {
            if self.fail_append.load(Ordering::Relaxed) {
                return Err(StoreError::Query("disk full".to_string()));
            }
            self.appended
                .lock()
                .unwrap()
                .push((session_id.to_string(), message.clone()));
            Ok(())
        }

        async fn recent(
            &self,
            session_id: &str,
            limit: u32,
        ) -> Result<Vec<ChatMessage>, StoreError> {
            if self.fail_recent.load(Ordering::Relaxed) {
                return Err(StoreError::Connection);
            }
            let appended = self.appended.lock().unwrap();
            let matching: Vec<ChatMessage> = appended
                .iter()
                .filter(|(id, _)| id == session_id)
                .map(|(_, m)| m.clone())
                .collect();
            let skip = matching.len().saturating_sub(limit as usize);
            Ok(matching.into_iter().skip(skip).collect())
        }
    }

    struct ScriptedProvider {
        name: &'static str,
        fragments: Vec<String>,
        // Rate-limit error emitted after the fragments, if any.
        fail_at_end: bool,
    }

    impl ScriptedProvider {
        fn ok(name: &'static str, fragments: &[&str]) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self {
                name,
                fragments: fragments.iter().map(|f| f.to_string()).collect(),
                fail_at_end: false,
            })
        }

        fn failing(name: &'static str) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self {
                name,
                fragments: Vec::new(),
                fail_at_end: true,
            })
        }
    }

    impl ProviderAdapter for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn generate(&self, _request: GenerationRequest) -> FragmentStream {
            let mut items: Vec<Result<String, ProviderError>> =
                self.fragments.iter().cloned().map(Ok).collect();
            if self.fail_at_end {
                items.push(Err(ProviderError::RateLimited));
            }
            Box::pin(futures_util::stream::iter(items))
        }
    }

    fn orchestrator(
        store: Arc<TestStore>,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
    ) -> ChatOrchestrator<TestStore> {
        ChatOrchestrator::new(
            store,
            Arc::new(ProviderPool::new(adapters)),
            HistoryAssembler::default(),
            20,
            GenerationParams::default(),
        )
    }

    fn user(content: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::new(MessageRole::User, content)]
    }

    async fn assistant_appends(store: &TestStore) -> Vec<ChatMessage> {
        for _ in 0..50 {
            let replies: Vec<ChatMessage> = store
                .appended()
                .into_iter()
                .map(|(_, m)| m)
                .filter(|m| m.role == MessageRole::Assistant)
                .collect();
            if !replies.is_empty() {
                return replies;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Vec::new()
    }

    #[tokio::test]
    async fn full_exchange_streams_and_persists_both_sides() {
        let store = TestStore::new();
        let orch = orchestrator(
            Arc::clone(&store),
            vec![ScriptedProvider::ok("p", &["He", "llo"])],
        );

        let stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
        let reply: String = stream
            .map(|item| item.unwrap())
            .collect::<Vec<_>>()
            .await
            .join("");
        assert_eq!(reply, "Hello");

        let replies = assistant_appends(&store).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "Hello");

        let inbound: Vec<_> = store
            .appended()
            .into_iter()
            .filter(|(_, m)| m.role == MessageRole::User)
            .collect();
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].0, "abcdef12");
        assert_eq!(inbound[0].1.content, "hi");
    }

    #[tokio::test]
    async fn history_read_failure_still_streams() {
        let store = TestStore::new();
        store.fail_recent.store(true, Ordering::Relaxed);
        let orch = orchestrator(
            Arc::clone(&store),
            vec![ScriptedProvider::ok("p", &["ok"])],
        );

        let stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
        let fragments: Vec<_> = stream.map(|item| item.unwrap()).collect().await;
        assert_eq!(fragments, vec!["ok"]);
    }

    #[tokio::test]
    async fn inbound_persist_failure_is_swallowed() {
        let store = TestStore::new();
        store.fail_append.store(true, Ordering::Relaxed);
        let orch = orchestrator(
            Arc::clone(&store),
            vec![ScriptedProvider::ok("p", &["ok"])],
        );

        let stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
        let fragments: Vec<_> = stream.map(|item| item.unwrap()).collect().await;
        assert_eq!(fragments, vec!["ok"]);
    }

    #[tokio::test]
    async fn provider_error_before_output_is_fatal() {
        let store = TestStore::new();
        let orch = orchestrator(Arc::clone(&store), vec![ScriptedProvider::failing("p")]);

        let result = orch.run("abcdef12", user("hi"), None, None).await;
        assert!(matches!(
            result,
            Err(RelayError::Provider(ProviderError::RateLimited))
        ));
    }

    #[tokio::test]
    async fn empty_pool_is_fatal() {
        let store = TestStore::new();
        let orch = orchestrator(Arc::clone(&store), Vec::new());

        let result = orch.run("abcdef12", user("hi"), None, None).await;
        assert!(matches!(result, Err(RelayError::NoProvider)));
        // The inbound message was still persisted before provider selection.
        assert_eq!(store.appended().len(), 1);
    }

    #[tokio::test]
    async fn providers_rotate_across_runs() {
        let store = TestStore::new();
        let orch = orchestrator(
            Arc::clone(&store),
            vec![
                ScriptedProvider::ok("a", &["from a"]),
                ScriptedProvider::ok("b", &["from b"]),
            ],
        );

        let mut seen = Vec::new();
        for _ in 0..3 {
            let stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
            let fragments: Vec<_> = stream.map(|item| item.unwrap()).collect().await;
            seen.push(fragments.join(""));
        }
        assert_eq!(seen, vec!["from a", "from b", "from a"]);
    }

    #[tokio::test]
    async fn abandoned_stream_persists_forwarded_prefix() {
        let store = TestStore::new();
        let orch = orchestrator(
            Arc::clone(&store),
            vec![ScriptedProvider::ok("p", &["first", "second"])],
        );

        let mut stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "first");
        drop(stream);

        let replies = assistant_appends(&store).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "first");
    }

    #[tokio::test]
    async fn no_output_means_no_assistant_row() {
        let store = TestStore::new();
        let orch = orchestrator(Arc::clone(&store), vec![ScriptedProvider::ok("p", &[])]);

        let stream = orch.run("abcdef12", user("hi"), None, None).await.unwrap();
        let fragments: Vec<_> = stream.collect().await;
        assert!(fragments.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let replies: Vec<_> = store
            .appended()
            .into_iter()
            .filter(|(_, m)| m.role == MessageRole::Assistant)
            .collect();
        assert!(replies.is_empty());
    }
}
