//! Core domain types for the presence-and-messaging subsystem.
//!
//! Chat identities are client-asserted (`{id?, nickname}`) and deliberately
//! kept separate from the session-authenticated user model of the rest of the
//! application: nothing here implies the guarantees of the stronger model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one live transport-level connection.
///
/// Owned by the transport layer; exists from connection-open to
/// connection-close and is never reused while still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Client-asserted identity bound to a connection via the `join` handshake.
///
/// The nickname is not verified against an authentication session on the
/// chat path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nickname: String,
}

/// Message class: broadcast to everyone or directed to one nickname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageKind {
    Public,
    Private,
}

/// A routed chat message, constructed at routing time and immutable after.
///
/// Delivery and persistence each receive their own copy, so a failure on one
/// path never mutates the other's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub sender_id: Option<String>,
    pub sender_nickname: String,
    /// Present iff `kind` is `Private`.
    pub recipient_nickname: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn public(
        sender_id: Option<String>,
        sender_nickname: String,
        text: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: MessageKind::Public,
            sender_id,
            sender_nickname,
            recipient_nickname: None,
            text,
            timestamp,
        }
    }

    pub fn private(
        sender_id: Option<String>,
        sender_nickname: String,
        recipient_nickname: String,
        text: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: MessageKind::Private,
            sender_id,
            sender_nickname,
            recipient_nickname: Some(recipient_nickname),
            text,
            timestamp,
        }
    }
}
