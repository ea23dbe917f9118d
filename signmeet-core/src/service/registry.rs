//! Room registry service.
//!
//! Owns the authoritative set of rooms and their participant lists and
//! enforces capacity. All mutations to a single room's participant set
//! happen under that room's map shard guard, which serializes the capacity
//! check-and-append; concurrent joins can never admit more participants
//! than `max_participants`. Storage writes happen after the guard is
//! released, so inference or slow persistence never holds a room lock.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use crate::models::{Participant, ParticipantId, Room, RoomId};
use crate::storage::Storage;
use crate::{Error, Result};

pub struct RoomRegistry {
    rooms: DashMap<RoomId, Room>,
    participants: DashMap<ParticipantId, Participant>,
    storage: Arc<dyn Storage>,
    default_max_participants: usize,
}

impl RoomRegistry {
    pub fn new(storage: Arc<dyn Storage>, default_max_participants: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            participants: DashMap::new(),
            storage,
            default_max_participants,
        }
    }

    /// Create a new room. Storage failures are logged and do not fail the
    /// creation; the in-memory registry stays authoritative.
    pub async fn create_room(&self, name: String, max_participants: Option<usize>) -> Room {
        let max = max_participants.unwrap_or(self.default_max_participants);
        let room = Room::new(name, Some(max));
        self.rooms.insert(room.id.clone(), room.clone());

        if let Err(e) = self.storage.save_room(&room).await {
            warn!(room_id = %room.id, error = %e, "Failed to persist room");
        }

        info!(
            room_id = %room.id,
            name = %room.name,
            max_participants = room.max_participants,
            "Room created"
        );
        room
    }

    pub fn get_room(&self, room_id: &RoomId) -> Result<Room> {
        self.rooms
            .get(room_id)
            .map(|room| room.clone())
            .ok_or_else(|| Error::NotFound(format!("Room {room_id} not found")))
    }

    /// Join a room: existence check, capacity check and participant append
    /// are a single atomic step under the room's guard.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        participant_name: String,
    ) -> Result<Participant> {
        let (participant, room_snapshot) = {
            let mut room = self
                .rooms
                .get_mut(room_id)
                .ok_or_else(|| Error::NotFound(format!("Room {room_id} not found")))?;

            if room.participants.len() >= room.max_participants {
                return Err(Error::RoomFull(format!(
                    "Room {room_id} is at capacity ({})",
                    room.max_participants
                )));
            }

            let participant = Participant::new(participant_name, room_id.clone());
            room.participants.push(participant.id.clone());
            (participant, room.clone())
        };

        self.participants
            .insert(participant.id.clone(), participant.clone());

        if let Err(e) = self.storage.save_participant(&participant).await {
            warn!(participant_id = %participant.id, error = %e, "Failed to persist participant");
        }
        if let Err(e) = self.storage.save_room(&room_snapshot).await {
            warn!(room_id = %room_id, error = %e, "Failed to persist room membership");
        }

        info!(
            room_id = %room_id,
            participant_id = %participant.id,
            name = %participant.name,
            "Participant joined room"
        );
        Ok(participant)
    }

    /// Remove a participant from a room. Idempotent: an absent room or
    /// participant id is a no-op, not an error.
    pub async fn leave_room(&self, room_id: &RoomId, participant_id: &ParticipantId) {
        let room_snapshot = self.rooms.get_mut(room_id).map(|mut room| {
            room.participants.retain(|id| id != participant_id);
            room.clone()
        });

        let removed = self.participants.remove(participant_id).is_some();

        if let Some(room) = room_snapshot {
            if let Err(e) = self.storage.save_room(&room).await {
                warn!(room_id = %room_id, error = %e, "Failed to persist room membership");
            }
        }

        if removed {
            if let Err(e) = self.storage.delete_participant(participant_id).await {
                warn!(participant_id = %participant_id, error = %e, "Failed to delete participant");
            }
            info!(
                room_id = %room_id,
                participant_id = %participant_id,
                "Participant left room"
            );
        }
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> Option<Participant> {
        self.participants.get(participant_id).map(|p| p.clone())
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn registry() -> Arc<RoomRegistry> {
        Arc::new(RoomRegistry::new(Arc::new(MemoryStorage::new()), 6))
    }

    #[tokio::test]
    async fn test_create_and_get_room() {
        let registry = registry();
        let room = registry.create_room("Demo".to_string(), None).await;
        assert_eq!(room.max_participants, 6);

        let found = registry.get_room(&room.id).unwrap();
        assert_eq!(found.name, "Demo");
    }

    #[tokio::test]
    async fn test_get_missing_room() {
        let registry = registry();
        let result = registry.get_room(&RoomId::new());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_join_missing_room_is_not_found() {
        let registry = registry();
        let result = registry
            .join_room(&RoomId::new(), "Alice".to_string())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_join_and_leave() {
        let registry = registry();
        let room = registry.create_room("Demo".to_string(), None).await;

        let alice = registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();
        assert_eq!(alice.room_id, room.id);
        assert_eq!(registry.get_room(&room.id).unwrap().participants.len(), 1);
        assert!(registry.participant(&alice.id).is_some());

        registry.leave_room(&room.id, &alice.id).await;
        assert!(registry.get_room(&room.id).unwrap().participants.is_empty());
        assert!(registry.participant(&alice.id).is_none());

        // Second leave with the same id is a no-op
        registry.leave_room(&room.id, &alice.id).await;
        assert!(registry.get_room(&room.id).unwrap().participants.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_scenario() {
        let registry = registry();
        let room = registry.create_room("Demo".to_string(), Some(2)).await;

        registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();
        let bob = registry
            .join_room(&room.id, "Bob".to_string())
            .await
            .unwrap();

        let carol = registry.join_room(&room.id, "Carol".to_string()).await;
        assert!(matches!(carol, Err(Error::RoomFull(_))));
        assert_eq!(registry.get_room(&room.id).unwrap().participants.len(), 2);

        registry.leave_room(&room.id, &bob.id).await;

        registry
            .join_room(&room.id, "Carol".to_string())
            .await
            .unwrap();
        assert_eq!(registry.get_room(&room.id).unwrap().participants.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_joins_respect_capacity() {
        let registry = registry();
        let room = registry.create_room("Busy".to_string(), Some(3)).await;

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = registry.clone();
                let room_id = room.id.clone();
                tokio::spawn(
                    async move { registry.join_room(&room_id, format!("user-{i}")).await },
                )
            })
            .collect();

        let results = futures::future::join_all(handles).await;
        let successes = results
            .iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        let full = results
            .iter()
            .filter(|r| matches!(r, Ok(Err(Error::RoomFull(_)))))
            .count();

        assert_eq!(successes, 3);
        assert_eq!(full, 7);
        assert_eq!(registry.get_room(&room.id).unwrap().participants.len(), 3);
    }
}
