//! SQLite-backed message store implementation.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::common::time::to_iso8601;
use crate::domain::Message;

use super::{MessageStore, PersistedMessageRecord, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS peer_chat_messages (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    kind               TEXT NOT NULL,
    sender_id          TEXT,
    sender_nickname    TEXT NOT NULL,
    recipient_nickname TEXT,
    text               TEXT NOT NULL,
    created_at         TEXT NOT NULL
)
"#;

/// Message store backed by a SQLite database via sqlx.
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Connect to the database at `url` and ensure the schema exists.
    ///
    /// The pool is capped at a single connection: writes are serialized
    /// anyway, and it keeps `sqlite::memory:` URLs pointing at one database.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn insert_message(&self, message: Message) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO peer_chat_messages \
             (kind, sender_id, sender_nickname, recipient_nickname, text, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.kind)
        .bind(&message.sender_id)
        .bind(&message.sender_nickname)
        .bind(&message.recipient_nickname)
        .bind(&message.text)
        .bind(to_iso8601(&message.timestamp))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn public_history(&self, limit: i64) -> Result<Vec<PersistedMessageRecord>, StoreError> {
        // Newest-first to apply the bound, then reversed to chronological
        // ascending for the caller.
        let mut rows = sqlx::query_as::<_, PersistedMessageRecord>(
            "SELECT id, kind, sender_id, sender_nickname, recipient_nickname, text, created_at \
             FROM peer_chat_messages \
             WHERE kind = 'public' \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.reverse();
        Ok(rows)
    }

    async fn private_history(
        &self,
        me: &str,
        other: &str,
        limit: i64,
    ) -> Result<Vec<PersistedMessageRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PersistedMessageRecord>(
            "SELECT id, kind, sender_id, sender_nickname, recipient_nickname, text, created_at \
             FROM peer_chat_messages \
             WHERE kind = 'private' \
               AND ((sender_nickname = ? AND recipient_nickname = ?) \
                 OR (sender_nickname = ? AND recipient_nickname = ?)) \
             ORDER BY created_at ASC, id ASC \
             LIMIT ?",
        )
        .bind(me)
        .bind(other)
        .bind(other)
        .bind(me)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageKind;
    use chrono::{DateTime, TimeZone, Utc};

    async fn memory_store() -> SqliteMessageStore {
        SqliteMessageStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store should connect")
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap()
    }

    fn public_at(text: &str, second: u32) -> Message {
        Message::public(None, "alice".to_string(), text.to_string(), at(second))
    }

    fn private_between(from: &str, to: &str, text: &str, second: u32) -> Message {
        Message::private(
            None,
            from.to_string(),
            to.to_string(),
            text.to_string(),
            at(second),
        )
    }

    #[tokio::test]
    async fn test_public_history_on_empty_store_is_empty() {
        // given:
        let store = memory_store().await;

        // when:
        let rows = store.public_history(50).await.unwrap();

        // then:
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_public_history_returns_last_messages_ascending() {
        // given: three public messages timestamped t1 < t2 < t3
        let store = memory_store().await;
        store.insert_message(public_at("first", 1)).await.unwrap();
        store.insert_message(public_at("second", 2)).await.unwrap();
        store.insert_message(public_at("third", 3)).await.unwrap();

        // when:
        let rows = store.public_history(2).await.unwrap();

        // then: the two newest, oldest first
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "second");
        assert_eq!(rows[1].text, "third");
        assert!(rows[0].created_at < rows[1].created_at);
    }

    #[tokio::test]
    async fn test_public_history_excludes_private_messages() {
        // given:
        let store = memory_store().await;
        store.insert_message(public_at("open", 1)).await.unwrap();
        store
            .insert_message(private_between("alice", "bob", "secret", 2))
            .await
            .unwrap();

        // when:
        let rows = store.public_history(50).await.unwrap();

        // then:
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, MessageKind::Public);
        assert_eq!(rows[0].text, "open");
    }

    #[tokio::test]
    async fn test_private_history_matches_both_directions_ascending() {
        // given: a conversation with messages in both directions
        let store = memory_store().await;
        store
            .insert_message(private_between("alice", "bob", "hi bob", 1))
            .await
            .unwrap();
        store
            .insert_message(private_between("bob", "alice", "hi alice", 2))
            .await
            .unwrap();
        store
            .insert_message(private_between("alice", "carol", "other thread", 3))
            .await
            .unwrap();

        // when: queried from either side
        let from_alice = store.private_history("alice", "bob", 100).await.unwrap();
        let from_bob = store.private_history("bob", "alice", 100).await.unwrap();

        // then: same rows, ascending, third party excluded
        assert_eq!(from_alice.len(), 2);
        assert_eq!(from_alice, from_bob);
        assert_eq!(from_alice[0].text, "hi bob");
        assert_eq!(from_alice[1].text, "hi alice");
    }

    #[tokio::test]
    async fn test_private_history_respects_limit() {
        // given:
        let store = memory_store().await;
        for second in 1..=5 {
            store
                .insert_message(private_between("alice", "bob", &format!("m{second}"), second))
                .await
                .unwrap();
        }

        // when:
        let rows = store.private_history("alice", "bob", 3).await.unwrap();

        // then: the limit bounds from the start of the ascending order
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text, "m1");
    }

    #[tokio::test]
    async fn test_insert_preserves_sender_and_recipient_fields() {
        // given:
        let store = memory_store().await;
        let message = Message::private(
            Some("u42".to_string()),
            "alice".to_string(),
            "bob".to_string(),
            "hello".to_string(),
            at(7),
        );

        // when:
        store.insert_message(message).await.unwrap();
        let rows = store.private_history("alice", "bob", 100).await.unwrap();

        // then:
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sender_id.as_deref(), Some("u42"));
        assert_eq!(rows[0].sender_nickname, "alice");
        assert_eq!(rows[0].recipient_nickname.as_deref(), Some("bob"));
        assert_eq!(rows[0].created_at, "2024-03-01T12:00:07.000Z");
    }
}
