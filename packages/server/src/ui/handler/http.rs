//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        http::{ErrorResponseDto, MessagesResponseDto, RoomSummaryDto},
        websocket::MessageDto,
    },
    ui::state::{AppState, MessagesQuery},
    usecase::FetchHistoryUseCase,
};

const DEFAULT_ROOM: &str = "general";

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .hub
        .rooms()
        .await
        .into_iter()
        .map(|(id, members)| RoomSummaryDto {
            id: id.into_string(),
            members,
        })
        .collect();

    Json(rooms)
}

/// Get recent messages of a room, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponseDto>, (StatusCode, Json<ErrorResponseDto>)> {
    let room_str = query.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
    let room = match RoomId::new(room_str.clone()) {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Invalid room '{}': {}", room_str, e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponseDto {
                    error: e.to_string(),
                }),
            ));
        }
    };

    let usecase = FetchHistoryUseCase::new(state.store.clone(), state.history_limit);
    match usecase.execute(&room, query.limit).await {
        Ok(messages) => Ok(Json(MessagesResponseDto {
            messages: messages.iter().map(MessageDto::from).collect(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch messages of room '{}': {}", room, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponseDto {
                    error: "Failed to fetch messages".to_string(),
                }),
            ))
        }
    }
}
