//! Ownership checks for chat rooms.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use medichat_core::domain::ChatRoom;

use crate::handlers::AppError;
use crate::state::AppState;

/// Loads a room and verifies the caller owns it.
///
/// Returns 404 when the room does not exist and 403 when it belongs to
/// someone else, so callers cannot probe for foreign room IDs by title.
pub async fn require_room_owner(
    state: &AppState,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<ChatRoom, Response> {
    let room = state
        .rooms
        .get_room(room_id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let Some(room) = room else {
        return Err(AppError::with_status(
            StatusCode::NOT_FOUND,
            "Chat room not found",
        ));
    };

    if room.user_id != user_id {
        return Err(AppError::with_status(
            StatusCode::FORBIDDEN,
            "Not the owner of this chat room",
        ));
    }

    Ok(room)
}
