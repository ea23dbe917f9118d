use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ParticipantId, RoomId};

/// Default room capacity when none is requested at creation
pub const DEFAULT_MAX_PARTICIPANTS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// IDs of participants currently in the room. Order carries no meaning;
    /// entries are unique and never exceed `max_participants`.
    pub participants: Vec<ParticipantId>,
    pub max_participants: usize,
}

impl Room {
    pub fn new(name: String, max_participants: Option<usize>) -> Self {
        Self {
            id: RoomId::new(),
            name,
            created_at: Utc::now(),
            participants: Vec::new(),
            max_participants: max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS),
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }
}
