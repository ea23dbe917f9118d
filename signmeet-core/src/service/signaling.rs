//! WebRTC signaling relay.
//!
//! Forwards offer/answer/ICE payloads between two specific connections.
//! Payloads are opaque and never inspected or validated; routing is purely
//! connection-id addressed with no room membership check. Delivery is
//! fire-and-forget: a dead target is dropped silently, consistent with
//! WebRTC's tolerance for lost signaling during renegotiation races.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::debug;

use super::hub::MessageHub;
use crate::events::{ServerEvent, SignalKind};
use crate::models::ConnectionId;

pub struct SignalingRouter {
    hub: Arc<MessageHub>,
}

impl SignalingRouter {
    pub fn new(hub: Arc<MessageHub>) -> Self {
        Self { hub }
    }

    /// Relay one signaling message to the target connection, stamped with
    /// the sender's connection id.
    pub fn relay(
        &self,
        kind: SignalKind,
        target: &ConnectionId,
        payload: JsonValue,
        sender: &ConnectionId,
    ) {
        let event = match kind {
            SignalKind::Offer => ServerEvent::WebrtcOffer {
                offer: payload,
                from_connection_id: sender.clone(),
            },
            SignalKind::Answer => ServerEvent::WebrtcAnswer {
                answer: payload,
                from_connection_id: sender.clone(),
            },
            SignalKind::IceCandidate => ServerEvent::WebrtcIceCandidate {
                candidate: payload,
                from_connection_id: sender.clone(),
            },
        };

        if !self.hub.send_to(target, event) {
            debug!(
                kind = %kind,
                target = %target,
                sender = %sender,
                "Signaling target unreachable, message dropped"
            );
        }
    }
}
