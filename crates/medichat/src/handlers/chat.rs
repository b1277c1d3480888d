//! Chatbot Q&A handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use medichat_auth::CurrentUser;
use medichat_core::domain::{ChatMessage, MessageSender};
use medichat_core::response::ApiResponse;

use crate::handlers::authz::require_room_owner;
use crate::handlers::AppError;
use crate::models::{Answer, AskQuestion};
use crate::state::AppState;

/// Ask the chatbot a question (POST /api/chat/ask).
///
/// Persists the question before contacting the chat service, so a failed
/// call still leaves the question in the room's history. The bot message
/// is only written once an answer arrives.
pub async fn ask(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AskQuestion>,
) -> Result<Json<ApiResponse<Answer>>, Response> {
    if let Err(message) = payload.validate() {
        return Err(AppError::with_status(StatusCode::BAD_REQUEST, message));
    }

    let room = require_room_owner(&state, payload.chat_room_id, user.id).await?;

    let question = ChatMessage::new(
        room.id,
        user.id,
        payload.question.as_str(),
        MessageSender::User,
    );
    state
        .messages
        .create_message(&question)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    // The accepted question counts as room activity for listing order,
    // whether or not the chat service answers it.
    state
        .rooms
        .update_room(&room.clone().touched())
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    let answer = match state.chat.ask(&payload.question).await {
        Ok(answer) => answer,
        Err(err) => {
            tracing::error!(room_id = %room.id, error = %err, "Chat service call failed");
            return Err(AppError::with_status(
                StatusCode::BAD_GATEWAY,
                "Chat service unavailable",
            ));
        }
    };

    let reply = ChatMessage::new(room.id, user.id, answer.as_str(), MessageSender::Bot);
    state
        .messages
        .create_message(&reply)
        .await
        .map_err(|e| AppError::from(e).into_response())?;

    tracing::info!(room_id = %room.id, "Question answered");

    Ok(Json(ApiResponse::success(
        200,
        Answer { answer },
        "Question answered",
    )))
}
