//! WebSocket handler for room realtime events.
//!
//! Each socket gets a fresh connection id and a hub registration. Inbound
//! frames are decoded into the tagged `ClientEvent` contract; malformed
//! frames are logged and dropped at this boundary. Socket close runs the
//! full disconnect flow: unbind, registry cleanup, `user_left` announce,
//! hub unregistration.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use signmeet_core::events::{ClientEvent, SignalKind};
use signmeet_core::models::ConnectionId;
use signmeet_core::service::ConnectionSession;
use tracing::{debug, error, info, warn};

use super::AppState;

pub async fn websocket_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Signaling frames are small; 64KB leaves ample room for SDP blobs
    ws.max_message_size(64 * 1024)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "Client connected");

    let mut events = state.hub.register(&connection_id);
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Pump server events into the socket until either side closes
    let send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(error = %e, "Failed to encode server event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(text.as_str()) {
                Ok(event) => dispatch(&state, &connection_id, event).await,
                Err(e) => {
                    warn!(
                        connection_id = %connection_id,
                        error = %e,
                        "Rejected malformed client event"
                    );
                }
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            // Ignore binary, ping and pong frames
            Ok(_) => {}
        }
    }

    disconnect(&state, &connection_id).await;
    send_task.abort();
    info!(connection_id = %connection_id, "Client disconnected");
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom {
            room_id,
            participant_id,
        } => {
            let stale = state
                .connections
                .bind(connection_id, room_id.clone(), participant_id.clone());
            if let Some(stale) = stale {
                if stale.room_id != room_id {
                    // The client never left its previous room; clean it up
                    // before announcing the new membership
                    leave(state, connection_id, &stale).await;
                }
            }
            state
                .presence
                .announce_join(&room_id, connection_id, participant_id);
        }
        ClientEvent::LeaveRoom { room_id } => {
            match state.connections.unbind(connection_id) {
                Some(session) => leave(state, connection_id, &session).await,
                None => {
                    debug!(
                        connection_id = %connection_id,
                        room_id = %room_id,
                        "leave_room from unbound connection"
                    );
                }
            }
        }
        ClientEvent::WebrtcOffer {
            target_connection_id,
            offer,
        } => {
            state
                .signaling
                .relay(SignalKind::Offer, &target_connection_id, offer, connection_id);
        }
        ClientEvent::WebrtcAnswer {
            target_connection_id,
            answer,
        } => {
            state.signaling.relay(
                SignalKind::Answer,
                &target_connection_id,
                answer,
                connection_id,
            );
        }
        ClientEvent::WebrtcIceCandidate {
            target_connection_id,
            candidate,
        } => {
            state.signaling.relay(
                SignalKind::IceCandidate,
                &target_connection_id,
                candidate,
                connection_id,
            );
        }
        ClientEvent::SendMessage {
            room_id,
            message,
            participant_name,
        } => {
            state
                .chat
                .send_message(&room_id, connection_id, participant_name, message);
        }
    }
}

/// Remove a session's room membership and announce the departure
async fn leave(state: &AppState, connection_id: &ConnectionId, session: &ConnectionSession) {
    if let Some(participant_id) = &session.participant_id {
        state
            .registry
            .leave_room(&session.room_id, participant_id)
            .await;
    }
    state.presence.announce_leave(&session.room_id, connection_id);
}

/// Abrupt or graceful disconnect: no dangling membership may survive
async fn disconnect(state: &AppState, connection_id: &ConnectionId) {
    if let Some(session) = state.connections.unbind(connection_id) {
        leave(state, connection_id, &session).await;
    }
    state.hub.unregister(connection_id);
}
