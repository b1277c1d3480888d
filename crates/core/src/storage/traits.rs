use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ChatMessage, ChatRoom, Hospital, HospitalVisit, User};

use super::Result;

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their login identifier.
    async fn get_user_by_login_id(&self, login_id: &str) -> Result<Option<User>>;

    /// Creates a new user. Fails with `AlreadyExists` on a duplicate login ID.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Repository for chat rooms.
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// Gets a room by its ID.
    async fn get_room(&self, id: Uuid) -> Result<Option<ChatRoom>>;

    /// Gets all rooms owned by a user, newest activity first.
    async fn rooms_for_user(&self, user_id: Uuid) -> Result<Vec<ChatRoom>>;

    /// Gets the user's rooms whose title contains `keyword`, newest activity
    /// first. The keyword is a literal substring, matched ASCII
    /// case-insensitively; it carries no wildcard syntax.
    async fn search_rooms(&self, user_id: Uuid, keyword: &str) -> Result<Vec<ChatRoom>>;

    /// Creates a new room.
    async fn create_room(&self, room: &ChatRoom) -> Result<()>;

    /// Updates an existing room (title and `updated_at`).
    async fn update_room(&self, room: &ChatRoom) -> Result<()>;
}

/// Repository for chat messages.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Gets all messages in a room, oldest first.
    async fn messages_for_room(&self, room_id: Uuid) -> Result<Vec<ChatMessage>>;

    /// Gets the most recent message in a room, if any.
    async fn last_message_for_room(&self, room_id: Uuid) -> Result<Option<ChatMessage>>;

    /// Appends a message to a room.
    async fn create_message(&self, message: &ChatMessage) -> Result<()>;
}

/// Repository for hospitals.
#[async_trait]
pub trait HospitalRepository: Send + Sync {
    /// Gets a hospital by its ID.
    async fn get_hospital(&self, id: Uuid) -> Result<Option<Hospital>>;

    /// Gets hospitals whose name contains `keyword`, sorted by name. Same
    /// literal, ASCII case-insensitive matching as room search.
    async fn search_hospitals(&self, keyword: &str) -> Result<Vec<Hospital>>;

    /// Adds a hospital to the directory.
    async fn create_hospital(&self, hospital: &Hospital) -> Result<()>;
}

/// Repository for hospital visits.
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Gets a visit by its ID.
    async fn get_visit(&self, id: Uuid) -> Result<Option<HospitalVisit>>;

    /// Gets all visits booked by a user, soonest first.
    async fn visits_for_user(&self, user_id: Uuid) -> Result<Vec<HospitalVisit>>;

    /// Books a new visit.
    async fn create_visit(&self, visit: &HospitalVisit) -> Result<()>;
}
