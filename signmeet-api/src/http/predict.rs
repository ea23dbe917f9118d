// Sign prediction HTTP handler

use axum::{extract::State, Json};
use serde::Deserialize;
use signmeet_core::models::{ParticipantId, RoomId};
use signmeet_core::service::Prediction;

use super::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Base64-encoded frame, with or without a data-URL prefix
    pub image_data: String,
    pub room_id: RoomId,
    pub participant_id: ParticipantId,
}

/// Classify a frame and, above the confidence gate, caption the room
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<Prediction>> {
    let prediction = state
        .captions
        .predict(&req.image_data, &req.room_id, &req.participant_id)
        .await?;
    Ok(Json(prediction))
}
