//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state.coordinator.snapshot().await.map_err(|e| {
        tracing::error!("Failed to get rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Domain Model から DTO への変換
    Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect()))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let rooms = state.coordinator.snapshot().await.map_err(|e| {
        tracing::error!("Failed to get room '{}': {}", room_id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    rooms
        .into_iter()
        .find(|room| room.id.as_str() == room_id)
        .map(|room| Json(RoomDetailDto::from(room)))
        .ok_or(StatusCode::NOT_FOUND)
}
