//! Durable message storage.
//!
//! The router and the history endpoints depend on the [`MessageStore`] trait
//! rather than a concrete database, so tests can substitute their own
//! implementations. The SQLite implementation lives in [`sqlite`].

mod sqlite;

pub use sqlite::SqliteMessageStore;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Message, MessageKind};

/// Errors surfaced by a message store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable row for one routed message.
///
/// `created_at` is RFC 3339 with millisecond precision, so chronological
/// order is also lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PersistedMessageRecord {
    pub id: i64,
    pub kind: MessageKind,
    pub sender_id: Option<String>,
    pub sender_nickname: String,
    pub recipient_nickname: Option<String>,
    pub text: String,
    pub created_at: String,
}

/// Data store interface for routed messages.
///
/// Writes happen exactly once per routed message on the happy path; there is
/// no retry, so persistence is best-effort ("observed once"). Reads serve the
/// history endpoints and are independent of live connection state.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a durable record of one routed message.
    async fn insert_message(&self, message: Message) -> Result<(), StoreError>;

    /// The last `limit` public messages, chronological ascending.
    async fn public_history(&self, limit: i64) -> Result<Vec<PersistedMessageRecord>, StoreError>;

    /// Private messages exchanged between two nicknames in either direction,
    /// chronological ascending, at most `limit` rows.
    async fn private_history(
        &self,
        me: &str,
        other: &str,
        limit: i64,
    ) -> Result<Vec<PersistedMessageRecord>, StoreError>;
}
