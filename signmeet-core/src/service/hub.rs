//! In-process hub routing outbound events to connected clients.
//!
//! Each connection registers an unbounded sender; the transport layer
//! drains the matching receiver. Sends are best-effort with at-most-once
//! delivery per currently-connected observer: a closed receiver is dropped
//! and unregistered, never retried.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::ServerEvent;
use crate::models::ConnectionId;

#[derive(Default)]
pub struct MessageHub {
    senders: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl MessageHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiver the transport layer
    /// drains into the socket.
    pub fn register(&self, connection_id: &ConnectionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(connection_id.clone(), tx);
        debug!(connection_id = %connection_id, "Connection registered with hub");
        rx
    }

    pub fn unregister(&self, connection_id: &ConnectionId) {
        self.senders.remove(connection_id);
        debug!(connection_id = %connection_id, "Connection unregistered from hub");
    }

    /// Unicast an event to one connection. Returns false when the target is
    /// gone; signaling callers treat that as a silent drop.
    pub fn send_to(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        let Some(sender) = self.senders.get(connection_id) else {
            debug!(
                connection_id = %connection_id,
                event_type = event.event_type(),
                "Target connection not registered, dropping event"
            );
            return false;
        };

        if sender.send(event).is_err() {
            drop(sender);
            warn!(connection_id = %connection_id, "Receiver closed, unregistering connection");
            self.senders.remove(connection_id);
            return false;
        }
        true
    }

    /// Fan an event out to a membership snapshot, excluding at most one
    /// connection. Returns the number of deliveries.
    pub fn broadcast(
        &self,
        targets: &[ConnectionId],
        exclude: Option<&ConnectionId>,
        event: &ServerEvent,
    ) -> usize {
        let mut sent = 0;
        for target in targets {
            if Some(target) == exclude {
                continue;
            }
            if self.send_to(target, event.clone()) {
                sent += 1;
            }
        }
        sent
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }
}
