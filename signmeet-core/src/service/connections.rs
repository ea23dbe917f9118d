//! Connection-to-participant binding table.
//!
//! Maps a live transport connection to its current (room, participant)
//! pair and keeps the reverse room index used for broadcast snapshots.
//! Entries are independent; per-connection bind/unbind only needs
//! per-entry exclusivity. The binding is a lookup key pair, never a handle
//! into the room record itself.

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::models::{ConnectionId, ParticipantId, RoomId};

/// Transient binding between a connection and a room membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSession {
    pub room_id: RoomId,
    pub participant_id: Option<ParticipantId>,
}

#[derive(Default)]
pub struct ConnectionSessionTable {
    sessions: DashMap<ConnectionId, ConnectionSession>,
    room_connections: DashMap<RoomId, Vec<ConnectionId>>,
}

impl ConnectionSessionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection to a room. Any prior binding for the connection is
    /// replaced and returned so the caller can clean up the old room.
    pub fn bind(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        participant_id: Option<ParticipantId>,
    ) -> Option<ConnectionSession> {
        let session = ConnectionSession {
            room_id: room_id.clone(),
            participant_id,
        };
        let previous = self.sessions.insert(connection_id.clone(), session);

        if let Some(prev) = &previous {
            if prev.room_id != room_id {
                self.remove_from_room_index(&prev.room_id, connection_id);
                warn!(
                    connection_id = %connection_id,
                    old_room_id = %prev.room_id,
                    new_room_id = %room_id,
                    "Connection rebound without leaving; replacing stale binding"
                );
            } else {
                // Same room: index entry already present
                debug!(connection_id = %connection_id, room_id = %room_id, "Connection rebound to same room");
                return previous;
            }
        }

        self.room_connections
            .entry(room_id.clone())
            .or_default()
            .push(connection_id.clone());

        debug!(connection_id = %connection_id, room_id = %room_id, "Connection bound to room");
        previous
    }

    /// Clear a connection's binding, returning it if one existed. Idempotent.
    pub fn unbind(&self, connection_id: &ConnectionId) -> Option<ConnectionSession> {
        let (_, session) = self.sessions.remove(connection_id)?;
        self.remove_from_room_index(&session.room_id, connection_id);
        debug!(connection_id = %connection_id, room_id = %session.room_id, "Connection unbound");
        Some(session)
    }

    #[must_use]
    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<ConnectionSession> {
        self.sessions.get(connection_id).map(|s| s.clone())
    }

    /// Snapshot of the connections currently bound to a room
    #[must_use]
    pub fn connections_in(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.room_connections
            .get(room_id)
            .map(|conns| conns.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.sessions.len()
    }

    fn remove_from_room_index(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        if let Some(mut conns) = self.room_connections.get_mut(room_id) {
            conns.retain(|id| id != connection_id);
            if conns.is_empty() {
                drop(conns);
                self.room_connections.remove(room_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let table = ConnectionSessionTable::new();
        let conn = ConnectionId::from_string("conn1".to_string());
        let room = RoomId::from_string("room1".to_string());
        let participant = ParticipantId::from_string("p1".to_string());

        assert!(table.lookup(&conn).is_none());

        let previous = table.bind(&conn, room.clone(), Some(participant.clone()));
        assert!(previous.is_none());

        let session = table.lookup(&conn).unwrap();
        assert_eq!(session.room_id, room);
        assert_eq!(session.participant_id, Some(participant));
        assert_eq!(table.connections_in(&room), vec![conn]);
    }

    #[test]
    fn test_rebind_replaces_stale_binding() {
        let table = ConnectionSessionTable::new();
        let conn = ConnectionId::from_string("conn1".to_string());
        let room_a = RoomId::from_string("roomA".to_string());
        let room_b = RoomId::from_string("roomB".to_string());

        table.bind(&conn, room_a.clone(), None);
        let previous = table.bind(&conn, room_b.clone(), None).unwrap();

        assert_eq!(previous.room_id, room_a);
        assert!(table.connections_in(&room_a).is_empty());
        assert_eq!(table.connections_in(&room_b), vec![conn.clone()]);
        assert_eq!(table.lookup(&conn).unwrap().room_id, room_b);
    }

    #[test]
    fn test_unbind_clears_binding_and_index() {
        let table = ConnectionSessionTable::new();
        let conn = ConnectionId::from_string("conn1".to_string());
        let room = RoomId::from_string("room1".to_string());

        table.bind(&conn, room.clone(), None);
        let session = table.unbind(&conn).unwrap();
        assert_eq!(session.room_id, room);

        assert!(table.lookup(&conn).is_none());
        assert!(table.connections_in(&room).is_empty());
        assert_eq!(table.bound_count(), 0);

        // Unbinding a dead connection is a no-op
        assert!(table.unbind(&conn).is_none());
    }

    #[test]
    fn test_room_index_tracks_multiple_connections() {
        let table = ConnectionSessionTable::new();
        let room = RoomId::from_string("room1".to_string());
        let conn1 = ConnectionId::from_string("conn1".to_string());
        let conn2 = ConnectionId::from_string("conn2".to_string());

        table.bind(&conn1, room.clone(), None);
        table.bind(&conn2, room.clone(), None);
        assert_eq!(table.connections_in(&room).len(), 2);

        table.unbind(&conn1);
        assert_eq!(table.connections_in(&room), vec![conn2]);
    }
}
