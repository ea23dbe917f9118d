//! Wire-level event contract between clients and the server.
//!
//! Every event kind is a tagged variant with a fixed field set, so malformed
//! frames are rejected when decoded at the transport boundary instead of
//! surfacing as missing-field bugs downstream. SDP blobs and ICE candidates
//! are opaque `serde_json::Value`s; the server relays them without
//! inspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::{Caption, ConnectionId, Participant, ParticipantId, RoomId};

/// Signaling message kinds relayed between two connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "webrtc_offer",
            Self::Answer => "webrtc_answer",
            Self::IceCandidate => "webrtc_ice_candidate",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events delivered by a client over its connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
        participant_id: Option<ParticipantId>,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    WebrtcOffer {
        target_connection_id: ConnectionId,
        offer: JsonValue,
    },
    WebrtcAnswer {
        target_connection_id: ConnectionId,
        answer: JsonValue,
    },
    WebrtcIceCandidate {
        target_connection_id: ConnectionId,
        candidate: JsonValue,
    },
    SendMessage {
        room_id: RoomId,
        message: String,
        participant_name: String,
    },
}

/// Events emitted by the server to connections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ParticipantJoined {
        participant: Participant,
        room_id: RoomId,
    },
    UserJoined {
        connection_id: ConnectionId,
        participant_id: Option<ParticipantId>,
    },
    UserLeft {
        connection_id: ConnectionId,
    },
    WebrtcOffer {
        offer: JsonValue,
        from_connection_id: ConnectionId,
    },
    WebrtcAnswer {
        answer: JsonValue,
        from_connection_id: ConnectionId,
    },
    WebrtcIceCandidate {
        candidate: JsonValue,
        from_connection_id: ConnectionId,
    },
    NewMessage {
        message: String,
        participant_name: String,
        timestamp: DateTime<Utc>,
        from_connection_id: ConnectionId,
    },
    NewCaption(Caption),
}

impl ServerEvent {
    /// Event kind tag, for logging
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ParticipantJoined { .. } => "participant_joined",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::WebrtcOffer { .. } => "webrtc_offer",
            Self::WebrtcAnswer { .. } => "webrtc_answer",
            Self::WebrtcIceCandidate { .. } => "webrtc_ice_candidate",
            Self::NewMessage { .. } => "new_message",
            Self::NewCaption(_) => "new_caption",
        }
    }
}
