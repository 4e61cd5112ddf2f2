//! Connection registry: which identity is bound to which live connection.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::domain::{ConnectionId, Identity};

/// Channel used to push serialized events to one connection's writer task.
pub type ClientSender = mpsc::UnboundedSender<String>;

/// Registry entry for one joined connection.
pub struct RegisteredClient {
    pub identity: Identity,
    pub sender: ClientSender,
    /// Join order, used for deterministic iteration.
    seq: u64,
}

/// Mapping from connection handle to the identity that joined on it.
///
/// A handle appears here iff its connection is live and has completed the
/// `join` handshake. The registry itself is not synchronized; `AppState`
/// wraps it in a single mutex so a lookup never observes a half-applied
/// join or disconnect.
#[derive(Default)]
pub struct PresenceRegistry {
    clients: HashMap<ConnectionId, RegisteredClient>,
    next_seq: u64,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the mapping for `handle`.
    ///
    /// Nickname uniqueness is not enforced. A re-join on an existing handle
    /// replaces the identity but keeps the handle's original position in
    /// iteration order.
    pub fn on_join(&mut self, handle: ConnectionId, identity: Identity, sender: ClientSender) {
        let seq = match self.clients.get(&handle) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.clients.insert(
            handle,
            RegisteredClient {
                identity,
                sender,
                seq,
            },
        );
    }

    /// Remove the mapping for `handle` if present; no-op otherwise.
    ///
    /// Returns whether an entry was actually removed, so the caller knows
    /// whether membership changed.
    pub fn on_disconnect(&mut self, handle: &ConnectionId) -> bool {
        self.clients.remove(handle).is_some()
    }

    pub fn get(&self, handle: &ConnectionId) -> Option<&RegisteredClient> {
        self.clients.get(handle)
    }

    /// Find the connection a nickname routes to: linear scan in join order,
    /// first match wins. Duplicate nicknames therefore route to the earliest
    /// still-live join, matching the source system's map iteration.
    pub fn lookup_by_nickname(&self, nickname: &str) -> Option<&RegisteredClient> {
        self.in_join_order()
            .find(|client| client.identity.nickname == nickname)
    }

    /// Point-in-time copy of all bound identities, in join order.
    pub fn snapshot(&self) -> Vec<Identity> {
        self.in_join_order()
            .map(|client| client.identity.clone())
            .collect()
    }

    /// All registered connections, in no particular order.
    pub fn clients(&self) -> impl Iterator<Item = (&ConnectionId, &RegisteredClient)> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    // Connection counts are small (a support-chat feature), so sorting per
    // call is cheaper than maintaining an ordered structure.
    fn in_join_order(&self) -> impl Iterator<Item = &RegisteredClient> {
        let mut clients: Vec<&RegisteredClient> = self.clients.values().collect();
        clients.sort_by_key(|client| client.seq);
        clients.into_iter()
    }
}
