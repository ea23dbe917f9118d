//! In-memory storage backend.
//!
//! Keeps rooms and participants as whole-record maps and captions as
//! per-room append-only logs.

use async_trait::async_trait;
use dashmap::DashMap;

use super::Storage;
use crate::models::{Caption, Participant, ParticipantId, Room, RoomId};
use crate::Result;

#[derive(Default)]
pub struct MemoryStorage {
    rooms: DashMap<RoomId, Room>,
    participants: DashMap<ParticipantId, Participant>,
    /// Captions per room in insertion order (oldest first)
    captions: DashMap<RoomId, Vec<Caption>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total caption count across all rooms
    #[must_use]
    pub fn caption_count(&self) -> usize {
        self.captions.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_room(&self, room: &Room) -> Result<()> {
        self.rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    async fn save_participant(&self, participant: &Participant) -> Result<()> {
        self.participants
            .insert(participant.id.clone(), participant.clone());
        Ok(())
    }

    async fn delete_participant(&self, id: &ParticipantId) -> Result<()> {
        self.participants.remove(id);
        Ok(())
    }

    async fn save_caption(&self, caption: &Caption) -> Result<()> {
        self.captions
            .entry(caption.room_id.clone())
            .or_default()
            .push(caption.clone());
        Ok(())
    }

    async fn find_participant(&self, id: &ParticipantId) -> Result<Option<Participant>> {
        Ok(self.participants.get(id).map(|p| p.clone()))
    }

    async fn list_recent_captions(&self, room_id: &RoomId, limit: usize) -> Result<Vec<Caption>> {
        let captions = match self.captions.get(room_id) {
            Some(entry) => entry.iter().rev().take(limit).cloned().collect(),
            None => Vec::new(),
        };
        Ok(captions)
    }
}
