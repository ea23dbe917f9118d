// Service status endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub model_loaded: bool,
}

pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "SignMeet API is running",
        model_loaded: state.captions.model_loaded(),
    })
}
