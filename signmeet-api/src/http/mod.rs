// Module: http
// HTTP/JSON REST API plus the WebSocket realtime endpoint

pub mod error;
pub mod health;
pub mod predict;
pub mod room;
pub mod websocket;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use signmeet_core::service::{
    CaptionPipeline, ChatService, ConnectionSessionTable, MessageHub, PresenceBroadcaster,
    RoomRegistry, SignalingRouter,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub connections: Arc<ConnectionSessionTable>,
    pub hub: Arc<MessageHub>,
    pub signaling: Arc<SignalingRouter>,
    pub presence: Arc<PresenceBroadcaster>,
    pub chat: Arc<ChatService>,
    pub captions: Arc<CaptionPipeline>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(health::root))
        .route("/api/rooms", post(room::create_room))
        .route("/api/rooms/{room_id}", get(room::get_room))
        .route("/api/rooms/{room_id}/join", post(room::join_room))
        .route("/api/rooms/{room_id}/captions", get(room::list_captions))
        .route("/api/predict", post(predict::predict))
        .route("/api/ws", get(websocket::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
