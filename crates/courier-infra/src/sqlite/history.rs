//! SQLite session history store implementation.
//!
//! Implements `SessionHistoryStore` from `courier-core` using sqlx with
//! split read/write pools. Rows are keyed by UUID v7 so insertion order and
//! key order agree; timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use courier_core::store::SessionHistoryStore;
use courier_types::chat::{ChatMessage, MessageRole};
use courier_types::error::StoreError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionHistoryStore`.
pub struct SqliteSessionHistoryStore {
    pool: DatabasePool,
}

impl SqliteSessionHistoryStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain messages.
struct MessageRow {
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, StoreError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        // created_at only participates in ordering but a malformed value
        // still indicates a corrupt row.
        parse_datetime(&self.created_at)?;
        Ok(ChatMessage::new(role, self.content))
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Connection
        }
        other => StoreError::Query(other.to_string()),
    }
}

impl SessionHistoryStore for SqliteSessionHistoryStore {
    async fn append(&self, session_id: &str, message: &ChatMessage) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO session_messages (id, session_id, role, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(session_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn recent(&self, session_id: &str, limit: u32) -> Result<Vec<ChatMessage>, StoreError> {
        // Newest-first LIMIT picks the window; the reverse restores
        // chronological order. `id` breaks created_at ties (UUID v7).
        let rows = sqlx::query(
            "SELECT role, content, created_at FROM session_messages
             WHERE session_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = rows
            .iter()
            .map(|row| MessageRow::from_row(row).map_err(map_sqlx_error)?.into_message())
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (tempfile::TempDir, SqliteSessionHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteSessionHistoryStore::new(pool))
    }

    fn msg(role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage::new(role, content)
    }

    #[tokio::test]
    async fn test_append_and_recent_roundtrip() {
        let (_dir, store) = test_store().await;

        store
            .append("session-a", &msg(MessageRole::User, "hi"))
            .await
            .unwrap();
        store
            .append("session-a", &msg(MessageRole::Assistant, "hello"))
            .await
            .unwrap();

        let messages = store.recent("session-a", 20).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "hello");
    }

    #[tokio::test]
    async fn test_recent_returns_window_oldest_first() {
        let (_dir, store) = test_store().await;

        for i in 0..5 {
            store
                .append("session-a", &msg(MessageRole::User, &format!("m{i}")))
                .await
                .unwrap();
        }

        let messages = store.recent("session-a", 3).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let (_dir, store) = test_store().await;
        let messages = store.recent("nope", 20).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (_dir, store) = test_store().await;

        store
            .append("session-a", &msg(MessageRole::User, "for a"))
            .await
            .unwrap();
        store
            .append("session-b", &msg(MessageRole::User, "for b"))
            .await
            .unwrap();

        let a = store.recent("session-a", 20).await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].content, "for a");
    }
}
