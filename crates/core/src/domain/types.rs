use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default title assigned to freshly created chat rooms.
pub const DEFAULT_ROOM_TITLE: &str = "New chat";

/// A registered user of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Login identifier chosen at registration. Unique.
    pub login_id: String,
    pub name: String,
    /// PHC-formatted password hash. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated UUID and current timestamps.
    pub fn new(
        login_id: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            login_id: login_id.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A chatbot conversation owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: Uuid,
    /// The owner. Only this user may read or rename the room.
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Creates a new room for `user_id` with the default title.
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: DEFAULT_ROOM_TITLE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Renames the room, bumping `updated_at`.
    pub fn renamed(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self.updated_at = Utc::now();
        self
    }

    /// Records fresh conversation activity by bumping `updated_at`, so
    /// room listings order by latest message as well as renames.
    pub fn touched(mut self) -> Self {
        self.updated_at = Utc::now();
        self
    }
}

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Bot,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// A single message inside a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    /// The room owner at the time the message was written.
    pub user_id: Uuid,
    pub content: String,
    pub sender: MessageSender,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new message in `room_id` with the current timestamp.
    pub fn new(
        room_id: Uuid,
        user_id: Uuid,
        content: impl Into<String>,
        sender: MessageSender,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            content: content.into(),
            sender,
            created_at: Utc::now(),
        }
    }
}

/// A hospital known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hospital {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A booked hospital visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalVisit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hospital_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl HospitalVisit {
    pub fn new(user_id: Uuid, hospital_id: Uuid, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            hospital_id,
            scheduled_at,
            created_at: Utc::now(),
        }
    }
}

/// Day of the week, used to annotate visit DTOs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// Human-readable label for display in client UIs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn new_room_gets_default_title() {
        let room = ChatRoom::new(Uuid::new_v4());
        assert_eq!(room.title, DEFAULT_ROOM_TITLE);
    }

    #[test]
    fn renamed_room_bumps_updated_at() {
        let room = ChatRoom::new(Uuid::new_v4());
        let created = room.updated_at;
        let renamed = room.renamed("Asthma questions");
        assert_eq!(renamed.title, "Asthma questions");
        assert!(renamed.updated_at >= created);
    }

    #[test]
    fn touched_room_bumps_updated_at_only() {
        let room = ChatRoom::new(Uuid::new_v4());
        let before = room.updated_at;
        let touched = room.clone().touched();
        assert_eq!(touched.title, room.title);
        assert!(touched.updated_at >= before);
    }

    #[test]
    fn user_password_hash_is_not_serialized() {
        let user = User::new("jdoe", "Jane Doe", "$argon2id$stub");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["login_id"], "jdoe");
    }

    #[test]
    fn weekday_conversion_matches_chrono() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(); // a Monday
        let day: WeekDay = date.weekday().into();
        assert_eq!(day, WeekDay::Monday);
        assert_eq!(day.label(), "Monday");
    }

    #[test]
    fn message_sender_as_str() {
        assert_eq!(MessageSender::User.as_str(), "user");
        assert_eq!(MessageSender::Bot.as_str(), "bot");
    }
}
