//! SessionHistoryStore trait definition.
//!
//! The durable history capability the orchestrator consumes: append a
//! role-tagged message under a session key, and fetch the most recent N
//! messages for a session in chronological order. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition); the backing implementation lives in
//! courier-infra (`SqliteSessionHistoryStore`).

use courier_types::chat::ChatMessage;
use courier_types::error::StoreError;

/// Repository trait for session-scoped message persistence.
///
/// Retention is the store's concern: the orchestrator only ever asks for
/// "the most recent N" and never ages out old rows itself.
pub trait SessionHistoryStore: Send + Sync {
    /// Append one message to the session's history.
    fn append(
        &self,
        session_id: &str,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Fetch the most recent `limit` messages for a session, oldest first.
    ///
    /// An unknown session yields an empty list, not an error.
    fn recent(
        &self,
        session_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;
}
