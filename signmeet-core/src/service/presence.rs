//! Join/leave presence notifications.
//!
//! Fan-out runs over a snapshot of the room's connection membership taken
//! at announce time, so a connection joining or leaving mid-broadcast is
//! delivered to at most once. For a single room, events are emitted in the
//! order the underlying registry operations completed; no cross-room
//! ordering is provided.

use std::sync::Arc;

use tracing::debug;

use super::connections::ConnectionSessionTable;
use super::hub::MessageHub;
use crate::events::ServerEvent;
use crate::models::{ConnectionId, Participant, ParticipantId, RoomId};

pub struct PresenceBroadcaster {
    connections: Arc<ConnectionSessionTable>,
    hub: Arc<MessageHub>,
}

impl PresenceBroadcaster {
    pub fn new(connections: Arc<ConnectionSessionTable>, hub: Arc<MessageHub>) -> Self {
        Self { connections, hub }
    }

    /// Notify a room that a connection joined, excluding the joiner itself
    /// (it already has confirmation via its own join response).
    pub fn announce_join(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        participant_id: Option<ParticipantId>,
    ) {
        let targets = self.connections.connections_in(room_id);
        let sent = self.hub.broadcast(
            &targets,
            Some(connection_id),
            &ServerEvent::UserJoined {
                connection_id: connection_id.clone(),
                participant_id,
            },
        );
        debug!(room_id = %room_id, connection_id = %connection_id, sent, "Announced join");
    }

    /// Notify a room that a connection left.
    pub fn announce_leave(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let targets = self.connections.connections_in(room_id);
        let sent = self.hub.broadcast(
            &targets,
            Some(connection_id),
            &ServerEvent::UserLeft {
                connection_id: connection_id.clone(),
            },
        );
        debug!(room_id = %room_id, connection_id = %connection_id, sent, "Announced leave");
    }

    /// Notify every connection in a room that a participant record was
    /// created (REST join). The joiner has no bound connection yet, so
    /// nothing is excluded.
    pub fn announce_participant_joined(&self, room_id: &RoomId, participant: &Participant) {
        let targets = self.connections.connections_in(room_id);
        self.hub.broadcast(
            &targets,
            None,
            &ServerEvent::ParticipantJoined {
                participant: participant.clone(),
                room_id: room_id.clone(),
            },
        );
    }
}
