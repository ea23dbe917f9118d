// Room management HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use signmeet_core::models::{Caption, Participant, Room, RoomId};

use super::{AppError, AppResult, AppState};

/// Create room request
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub max_participants: Option<usize>,
}

/// Join room request
#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub name: String,
}

/// Create a new room
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<Json<Room>> {
    if req.name.is_empty() {
        return Err(AppError::bad_request("Room name cannot be empty"));
    }
    if req.max_participants == Some(0) {
        return Err(AppError::bad_request("Room capacity must be at least 1"));
    }

    let room = state.registry.create_room(req.name, req.max_participants).await;
    Ok(Json(room))
}

/// Get room details
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> AppResult<Json<Room>> {
    let room = state.registry.get_room(&RoomId::from_string(room_id))?;
    Ok(Json(room))
}

/// Join a room, notifying current members
pub async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> AppResult<Json<Participant>> {
    if req.name.is_empty() {
        return Err(AppError::bad_request("Participant name cannot be empty"));
    }

    let room_id = RoomId::from_string(room_id);
    let participant = state.registry.join_room(&room_id, req.name).await?;
    state
        .presence
        .announce_participant_joined(&room_id, &participant);
    Ok(Json(participant))
}

/// Recent captions for a room, newest first
pub async fn list_captions(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> AppResult<Json<Vec<Caption>>> {
    let captions = state
        .captions
        .recent_captions(&RoomId::from_string(room_id))
        .await?;
    Ok(Json(captions))
}
