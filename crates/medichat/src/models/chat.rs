//! Request and response DTOs for the chat endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medichat_core::domain::{ChatMessage, ChatRoom, MessageSender};

/// Timestamp format used in room-list DTOs.
const LAST_MESSAGE_AT_FORMAT: &str = "%Y.%m.%d %H:%M";

/// Request payload for renaming a chat room.
#[derive(Debug, Deserialize)]
pub struct RenameChatRoom {
    pub title: String,
}

impl RenameChatRoom {
    /// Checks that the new title is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request payload for asking the chatbot a question.
#[derive(Debug, Deserialize)]
pub struct AskQuestion {
    pub chat_room_id: Uuid,
    pub question: String,
}

impl AskQuestion {
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question must not be empty".to_string());
        }
        Ok(())
    }
}

/// Response payload for a freshly created chat room.
#[derive(Debug, Serialize)]
pub struct CreatedChatRoom {
    pub chat_room_id: Uuid,
    pub title: String,
}

impl From<&ChatRoom> for CreatedChatRoom {
    fn from(room: &ChatRoom) -> Self {
        Self {
            chat_room_id: room.id,
            title: room.title.clone(),
        }
    }
}

/// Room-list item: the room plus a preview of its latest message.
#[derive(Debug, Serialize)]
pub struct ChatRoomSummary {
    pub chat_room_id: Uuid,
    pub title: String,
    pub last_message: Option<String>,
    /// Formatted `%Y.%m.%d %H:%M`, `null` for rooms with no messages.
    pub last_message_at: Option<String>,
}

impl ChatRoomSummary {
    pub fn new(room: &ChatRoom, last: Option<&ChatMessage>) -> Self {
        Self {
            chat_room_id: room.id,
            title: room.title.clone(),
            last_message: last.map(|m| m.content.clone()),
            last_message_at: last.map(|m| format_last_message_at(&m.created_at)),
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Serialize)]
pub struct ChatMessageDto {
    pub content: String,
    pub sender: MessageSender,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            content: message.content.clone(),
            sender: message.sender,
        }
    }
}

/// Response payload for a chatbot answer.
#[derive(Debug, Serialize)]
pub struct Answer {
    pub answer: String,
}

fn format_last_message_at(at: &DateTime<Utc>) -> String {
    at.format(LAST_MESSAGE_AT_FORMAT).to_string()
}
