//! Chat message relay.
//!
//! Text messages are ephemeral: stamped with a server timestamp and fanned
//! out to the whole room (sender included), never persisted.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::connections::ConnectionSessionTable;
use super::hub::MessageHub;
use crate::events::ServerEvent;
use crate::models::{ConnectionId, RoomId};

pub struct ChatService {
    connections: Arc<ConnectionSessionTable>,
    hub: Arc<MessageHub>,
}

impl ChatService {
    pub fn new(connections: Arc<ConnectionSessionTable>, hub: Arc<MessageHub>) -> Self {
        Self { connections, hub }
    }

    pub fn send_message(
        &self,
        room_id: &RoomId,
        from: &ConnectionId,
        participant_name: String,
        message: String,
    ) {
        let targets = self.connections.connections_in(room_id);
        let sent = self.hub.broadcast(
            &targets,
            None,
            &ServerEvent::NewMessage {
                message,
                participant_name,
                timestamp: Utc::now(),
                from_connection_id: from.clone(),
            },
        );
        debug!(room_id = %room_id, from = %from, sent, "Chat message relayed");
    }
}
