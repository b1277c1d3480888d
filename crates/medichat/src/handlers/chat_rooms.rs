//! Chat room CRUD handlers.
//!
//! All room handlers require an authenticated caller and enforce
//! ownership on room access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use medichat_auth::CurrentUser;
use medichat_core::domain::ChatRoom;
use medichat_core::response::ApiResponse;

use crate::handlers::authz::require_room_owner;
use crate::handlers::AppError;
use crate::models::{ChatMessageDto, ChatRoomSummary, CreatedChatRoom, RenameChatRoom};
use crate::state::AppState;

/// Query parameters for room search.
#[derive(Debug, Deserialize)]
pub struct SearchRoomsQuery {
    #[serde(default)]
    pub keyword: String,
}

/// Create a new chat room (POST /api/chat/rooms).
///
/// The room starts with the default title; the client renames it later.
pub async fn create_room(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Response> {
    let room = ChatRoom::new(user.id);
    state
        .rooms
        .create_room(&room)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(room_id = %room.id, user_id = %user.id, "Chat room created");

    let body = ApiResponse::success(201, CreatedChatRoom::from(&room), "Chat room created");
    Ok((StatusCode::CREATED, Json(body)))
}

/// Rename a chat room (PUT /api/chat/rooms/{id}).
pub async fn rename_room(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Json(payload): Json<RenameChatRoom>,
) -> Result<Json<ApiResponse<()>>, Response> {
    if let Err(message) = payload.validate() {
        return Err(AppError::with_status(StatusCode::BAD_REQUEST, message));
    }

    let room = require_room_owner(&state, room_id, user.id).await?;

    let renamed = room.renamed(payload.title);
    state
        .rooms
        .update_room(&renamed)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    Ok(Json(ApiResponse::success_empty(200, "Title updated")))
}

/// List the caller's chat rooms (GET /api/chat/rooms).
///
/// Each item carries the latest message as a preview.
pub async fn list_rooms(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChatRoomSummary>>>, Response> {
    let rooms = state
        .rooms
        .rooms_for_user(user.id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let summaries = summarize_rooms(&state, rooms).await?;
    Ok(Json(ApiResponse::success(
        200,
        summaries,
        "Chat rooms fetched",
    )))
}

/// Search the caller's rooms by title (GET /api/chat/rooms/search?keyword=).
pub async fn search_rooms(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<SearchRoomsQuery>,
) -> Result<Json<ApiResponse<Vec<ChatRoomSummary>>>, Response> {
    let rooms = state
        .rooms
        .search_rooms(user.id, &query.keyword)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let summaries = summarize_rooms(&state, rooms).await?;
    Ok(Json(ApiResponse::success(
        200,
        summaries,
        "Chat rooms fetched",
    )))
}

/// Conversation history of a room (GET /api/chat/rooms/{id}/messages).
pub async fn list_messages(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChatMessageDto>>>, Response> {
    require_room_owner(&state, room_id, user.id).await?;

    let messages = state
        .messages
        .messages_for_room(room_id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let dtos = messages.iter().map(ChatMessageDto::from).collect();
    Ok(Json(ApiResponse::success(200, dtos, "Messages fetched")))
}

/// Attaches the latest message to each room, preserving room order.
async fn summarize_rooms(
    state: &AppState,
    rooms: Vec<ChatRoom>,
) -> Result<Vec<ChatRoomSummary>, Response> {
    let mut summaries = Vec::with_capacity(rooms.len());
    for room in &rooms {
        let last = state
            .messages
            .last_message_for_room(room.id)
            .await
            .map_err(|e| AppError::from(e).into_response())?;
        summaries.push(ChatRoomSummary::new(room, last.as_ref()));
    }
    Ok(summaries)
}
