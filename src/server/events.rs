//! Wire protocol: JSON events exchanged with chat clients.
//!
//! Every frame is a single JSON object tagged by `type` (kebab-case) with
//! camelCase fields, matching what the browser client sends and expects.

use serde::{Deserialize, Serialize};

use crate::common::time::to_iso8601;
use crate::domain::{Identity, Message};

/// Inbound events (client to server).
///
/// There is no response channel for these, so a frame that fails to parse is
/// dropped and logged rather than answered with an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Bind a client-asserted identity to this connection.
    Join {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        nickname: String,
    },
    /// Subscribe to a room channel. Adjacent feature: accepted so clients
    /// sharing the transport do not hit the malformed-event path, but room
    /// semantics live outside this subsystem.
    #[serde(rename_all = "camelCase")]
    JoinChatRoom { room_id: String },
    /// Broadcast routing path.
    #[serde(rename_all = "camelCase")]
    PublicMessage {
        nickname: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    /// Directed routing path.
    #[serde(rename_all = "camelCase")]
    PrivateMessage {
        to_nickname: String,
        from_nickname: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
}

/// Outbound events (server to client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Presence snapshot pushed on every membership change.
    OnlineUsers { users: Vec<Identity> },
    PublicMessage {
        nickname: String,
        text: String,
        timestamp: String,
    },
    /// Directed delivery. The sender's echo copy additionally carries `to`
    /// and `isSelf: true` so its client can distinguish its own message.
    #[serde(rename_all = "camelCase")]
    PrivateMessage {
        from: String,
        text: String,
        timestamp: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_self: Option<bool>,
    },
}

impl ServerEvent {
    /// Delivery copy of a public message.
    pub fn public_message(message: &Message) -> Self {
        Self::PublicMessage {
            nickname: message.sender_nickname.clone(),
            text: message.text.clone(),
            timestamp: to_iso8601(&message.timestamp),
        }
    }

    /// Delivery copy of a private message, as seen by the recipient.
    pub fn private_message(message: &Message) -> Self {
        Self::PrivateMessage {
            from: message.sender_nickname.clone(),
            text: message.text.clone(),
            timestamp: to_iso8601(&message.timestamp),
            to: None,
            is_self: None,
        }
    }

    /// Echo copy of a private message, sent back to the sender's own
    /// connection.
    pub fn private_echo(message: &Message) -> Self {
        Self::PrivateMessage {
            from: message.sender_nickname.clone(),
            text: message.text.clone(),
            timestamp: to_iso8601(&message.timestamp),
            to: message.recipient_nickname.clone(),
            is_self: Some(true),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server events serialize to JSON")
    }
}
