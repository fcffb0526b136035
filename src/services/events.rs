//! Notification bus for store mutations
//!
//! Broadcast-channel fan-out: every subscriber gets its own receiver, and a
//! publish reaches exactly the receivers subscribed at publish time. Events
//! carry the full current collections, not deltas, so a late or lagged
//! subscriber only ever renders complete state.

use tokio::sync::broadcast;

use crate::domain::{AuditLogEntry, Lead};

#[derive(Debug, Clone)]
pub enum StoreEvent {
    LeadsUpdate(Vec<Lead>),
    AuditLogsUpdate(Vec<AuditLogEntry>),
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::LeadsUpdate(_) => "leads-update",
            StoreEvent::AuditLogsUpdate(_) => "audit-logs-update",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Deliver to all current subscribers. An event published with nobody
    /// listening is dropped, which is the intended fire-and-forget contract.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(32)
    }
}
