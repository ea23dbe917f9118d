//! Persistence collaborator interface.
//!
//! The core treats these as durable key lookups and appends; it does not
//! implement transactions across them. Captions are owned by storage once
//! handed off.

pub mod memory;

use async_trait::async_trait;

use crate::models::{Caption, Participant, ParticipantId, Room, RoomId};
use crate::Result;

pub use memory::MemoryStorage;

/// Default window for recent-caption queries
pub const RECENT_CAPTIONS_LIMIT: usize = 50;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert or replace a room record
    async fn save_room(&self, room: &Room) -> Result<()>;

    /// Insert or replace a participant record
    async fn save_participant(&self, participant: &Participant) -> Result<()>;

    /// Remove a participant record; absent id is a no-op
    async fn delete_participant(&self, id: &ParticipantId) -> Result<()>;

    /// Append a caption record
    async fn save_caption(&self, caption: &Caption) -> Result<()>;

    /// Look up a participant by id
    async fn find_participant(&self, id: &ParticipantId) -> Result<Option<Participant>>;

    /// Most recent captions for a room, newest first
    async fn list_recent_captions(&self, room_id: &RoomId, limit: usize) -> Result<Vec<Caption>>;
}
