//! Fire-and-forget persistence of routed messages.

use std::sync::Arc;

use crate::domain::Message;
use crate::store::MessageStore;

/// Hands routed messages to the store without gating the caller on the
/// outcome.
///
/// `record` is always invoked after routing decisions are made, so a slow or
/// failing store cannot delay delivery. Store errors stop here: they are
/// logged and discarded, never retried and never surfaced to the router or
/// the sender. Losing a history row is acceptable; losing live delivery is
/// not.
#[derive(Clone)]
pub struct PersistenceSink {
    store: Arc<dyn MessageStore>,
}

impl PersistenceSink {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Dispatch one write attempt on a detached task and return immediately.
    pub fn record(&self, message: Message) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.insert_message(message).await {
                tracing::warn!("failed to persist chat message: {}", e);
            }
        });
    }
}
