//! Shared application state.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::store::MessageStore;

use super::registry::PresenceRegistry;
use super::sink::PersistenceSink;

/// Shared state handed to every connection handler and REST endpoint.
pub struct AppState {
    /// The one piece of shared mutable state: registry access is serialized
    /// through this mutex.
    pub registry: Mutex<PresenceRegistry>,
    /// Fire-and-forget write path for routed messages.
    pub sink: PersistenceSink,
    /// Read path for the history endpoints.
    pub store: Arc<dyn MessageStore>,
    /// Source of message timestamps; swapped for a fixed clock in tests.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Mutex::new(PresenceRegistry::new()),
            sink: PersistenceSink::new(Arc::clone(&store)),
            store,
            clock,
        }
    }
}
