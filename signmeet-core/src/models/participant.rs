use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ParticipantId, RoomId};

/// A named identity scoped to one room for its lifetime.
///
/// A participant is never reassigned to a different room; leaving destroys
/// the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub room_id: RoomId,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(name: String, room_id: RoomId) -> Self {
        Self {
            id: ParticipantId::new(),
            name,
            room_id,
            joined_at: Utc::now(),
        }
    }
}
