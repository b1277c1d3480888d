//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use medichat_core::domain::{ChatMessage, ChatRoom, Hospital, HospitalVisit, MessageSender, User};

/// Convert a SQLite row to a User.
///
/// Expected columns: id, login_id, name, password_hash, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let login_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(User {
        id: parse_uuid(&id)?,
        login_id,
        name,
        password_hash,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a ChatRoom.
///
/// Expected columns: id, user_id, title, created_at, updated_at
pub fn row_to_room(row: &Row) -> rusqlite::Result<ChatRoom> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let title: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(ChatRoom {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        title,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a ChatMessage.
///
/// Expected columns: id, room_id, user_id, content, sender, created_at
pub fn row_to_message(row: &Row) -> rusqlite::Result<ChatMessage> {
    let id: String = row.get(0)?;
    let room_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let content: String = row.get(3)?;
    let sender: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(ChatMessage {
        id: parse_uuid(&id)?,
        room_id: parse_uuid(&room_id)?,
        user_id: parse_uuid(&user_id)?,
        content,
        sender: parse_sender(&sender)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Convert a SQLite row to a Hospital.
///
/// Expected columns: id, name, phone, address, created_at, updated_at
pub fn row_to_hospital(row: &Row) -> rusqlite::Result<Hospital> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let phone: String = row.get(2)?;
    let address: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Hospital {
        id: parse_uuid(&id)?,
        name,
        phone,
        address,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a HospitalVisit.
///
/// Expected columns: id, user_id, hospital_id, scheduled_at, created_at
pub fn row_to_visit(row: &Row) -> rusqlite::Result<HospitalVisit> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let hospital_id: String = row.get(2)?;
    let scheduled_at: String = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(HospitalVisit {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        hospital_id: parse_uuid(&hospital_id)?,
        scheduled_at: parse_datetime(&scheduled_at)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Serialize a MessageSender to its storage string.
pub fn sender_to_string(sender: &MessageSender) -> &'static str {
    sender.as_str()
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a MessageSender from its storage string.
fn parse_sender(s: &str) -> rusqlite::Result<MessageSender> {
    match s {
        "user" => Ok(MessageSender::User),
        "bot" => Ok(MessageSender::Bot),
        _ => Err(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Unknown sender: {}", s),
            )),
        )),
    }
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
