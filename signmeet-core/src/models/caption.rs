use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CaptionId, RoomId};

/// A timestamped, attributed text record derived from a confidence-gated
/// classification result. Immutable once created; append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub id: CaptionId,
    pub text: String,
    pub participant_name: String,
    pub room_id: RoomId,
    pub timestamp: DateTime<Utc>,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
}

impl Caption {
    pub fn new(text: String, participant_name: String, room_id: RoomId, confidence: f64) -> Self {
        Self {
            id: CaptionId::new(),
            text,
            participant_name,
            room_id,
            timestamp: Utc::now(),
            confidence,
        }
    }
}
