//! Message routing: fan-out decisions for public and private messages, plus
//! presence broadcasts.
//!
//! Each inbound event is handled to completion against a single consistent
//! view of the registry (the registry lock is held across the fan-out), so a
//! delivery decision never observes a half-applied join or disconnect. The
//! persistence hand-off happens after delivery and never blocks it.

use crate::domain::{ConnectionId, Message};

use super::events::ServerEvent;
use super::registry::PresenceRegistry;
use super::state::AppState;

/// Push the current presence snapshot to every registered connection.
///
/// Called with the registry lock already held by the mutating transition, so
/// the broadcast reflects exactly the membership change that triggered it.
pub fn broadcast_presence(registry: &PresenceRegistry) {
    let payload = ServerEvent::OnlineUsers {
        users: registry.snapshot(),
    }
    .to_json();
    for (handle, client) in registry.clients() {
        if client.sender.send(payload.clone()).is_err() {
            tracing::warn!("failed to push online-users to connection {}", handle);
        }
    }
}

/// Public path: deliver to every registered connection, sender included,
/// then hand off to the persistence sink.
pub async fn route_public(
    state: &AppState,
    nickname: String,
    user_id: Option<String>,
    text: String,
) {
    let message = Message::public(user_id, nickname, text, state.clock.now());
    let payload = ServerEvent::public_message(&message).to_json();
    {
        let registry = state.registry.lock().await;
        for (handle, client) in registry.clients() {
            if client.sender.send(payload.clone()).is_err() {
                tracing::warn!("failed to push public message to connection {}", handle);
            }
        }
    }
    state.sink.record(message);
}

/// Private path: deliver to the recipient's connection if one is live, echo
/// to the sender's own connection, and persist regardless.
///
/// A recipient with no live connection is a silent no-op for delivery; the
/// sender is not told. History still records the message.
pub async fn route_private(
    state: &AppState,
    sender_handle: ConnectionId,
    to_nickname: String,
    from_nickname: String,
    user_id: Option<String>,
    text: String,
) {
    let message = Message::private(user_id, from_nickname, to_nickname, text, state.clock.now());
    {
        let registry = state.registry.lock().await;

        let recipient_nickname = message
            .recipient_nickname
            .as_deref()
            .unwrap_or_default();
        match registry.lookup_by_nickname(recipient_nickname) {
            Some(recipient) => {
                let payload = ServerEvent::private_message(&message).to_json();
                if recipient.sender.send(payload).is_err() {
                    tracing::warn!(
                        "failed to push private message to nickname '{}'",
                        recipient_nickname
                    );
                }
            }
            None => {
                tracing::debug!(
                    "no live connection for nickname '{}', delivering to nobody",
                    recipient_nickname
                );
            }
        }

        // Echo back on the sending connection itself, not via nickname
        // lookup, so duplicate nicknames cannot misdirect the echo.
        if let Some(sender) = registry.get(&sender_handle) {
            let echo = ServerEvent::private_echo(&message).to_json();
            if sender.sender.send(echo).is_err() {
                tracing::warn!("failed to echo private message to connection {}", sender_handle);
            }
        }
    }
    state.sink.record(message);
}
