//! SQLite repository implementation.
//!
//! Implements the repository traits from `medichat_core::storage` using
//! SQLite via `tokio-rusqlite`.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use medichat_core::domain::{ChatMessage, ChatRoom, Hospital, HospitalVisit, User};
use medichat_core::storage::{
    ChatMessageRepository, ChatRoomRepository, HospitalRepository, RepositoryError, Result,
    UserRepository, VisitRepository,
};

use super::conversions::{
    format_datetime, row_to_hospital, row_to_message, row_to_room, row_to_user, row_to_visit,
    sender_to_string,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Escapes LIKE metacharacters so a search keyword matches literally.
///
/// The search queries declare `ESCAPE '\'`; without this a keyword of
/// `%` would match every row.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }

    async fn get_user_by_login_id(&self, login_id: &str) -> Result<Option<User>> {
        let login = login_id.to_string();
        let login_for_err = login.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_LOGIN_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&login], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", login_for_err))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let login_id = user.login_id.clone();
        let name = user.name.clone();
        let password_hash = user.password_hash.clone();
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let login_for_err = user.login_id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, login_id, name, password_hash, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", login_for_err))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let login_id = user.login_id.clone();
        let name = user.name.clone();
        let password_hash = user.password_hash.clone();
        let updated_at = format_datetime(&user.updated_at);
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![id, login_id, name, password_hash, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_id))
    }
}

#[async_trait]
impl ChatRoomRepository for SqliteRepository {
    async fn get_room(&self, id: Uuid) -> Result<Option<ChatRoom>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ROOM_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_room) {
                    Ok(room) => Ok(Some(room)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ChatRoom", id.to_string()))
    }

    async fn rooms_for_user(&self, user_id: Uuid) -> Result<Vec<ChatRoom>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ROOMS_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_room)
                    .map_err(wrap_err)?;

                let mut rooms = Vec::new();
                for row_result in rows {
                    rooms.push(row_result.map_err(wrap_err)?);
                }
                Ok(rooms)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn search_rooms(&self, user_id: Uuid, keyword: &str) -> Result<Vec<ChatRoom>> {
        let user_id_str = user_id.to_string();
        let keyword = escape_like(keyword);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SEARCH_ROOMS_BY_TITLE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str, &keyword], row_to_room)
                    .map_err(wrap_err)?;

                let mut rooms = Vec::new();
                for row_result in rows {
                    rooms.push(row_result.map_err(wrap_err)?);
                }
                Ok(rooms)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_room(&self, room: &ChatRoom) -> Result<()> {
        let id = room.id.to_string();
        let user_id = room.user_id.to_string();
        let title = room.title.clone();
        let created_at = format_datetime(&room.created_at);
        let updated_at = format_datetime(&room.updated_at);
        let room_id = room.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ROOM,
                    rusqlite::params![id, user_id, title, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ChatRoom", room_id))
    }

    async fn update_room(&self, room: &ChatRoom) -> Result<()> {
        let id = room.id.to_string();
        let title = room.title.clone();
        let updated_at = format_datetime(&room.updated_at);
        let room_id = room.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_ROOM, rusqlite::params![id, title, updated_at])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ChatRoom", room_id))
    }
}

#[async_trait]
impl ChatMessageRepository for SqliteRepository {
    async fn messages_for_room(&self, room_id: Uuid) -> Result<Vec<ChatMessage>> {
        let room_id_str = room_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_MESSAGES_BY_ROOM)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&room_id_str], row_to_message)
                    .map_err(wrap_err)?;

                let mut messages = Vec::new();
                for row_result in rows {
                    messages.push(row_result.map_err(wrap_err)?);
                }
                Ok(messages)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn last_message_for_room(&self, room_id: Uuid) -> Result<Option<ChatMessage>> {
        let room_id_str = room_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_LAST_MESSAGE_BY_ROOM)
                    .map_err(wrap_err)?;
                match stmt.query_row([&room_id_str], row_to_message) {
                    Ok(message) => Ok(Some(message)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_message(&self, message: &ChatMessage) -> Result<()> {
        let id = message.id.to_string();
        let room_id = message.room_id.to_string();
        let user_id = message.user_id.to_string();
        let content = message.content.clone();
        let sender = sender_to_string(&message.sender).to_string();
        let created_at = format_datetime(&message.created_at);
        let message_id = message.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_MESSAGE,
                    rusqlite::params![id, room_id, user_id, content, sender, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ChatMessage", message_id))
    }
}

#[async_trait]
impl HospitalRepository for SqliteRepository {
    async fn get_hospital(&self, id: Uuid) -> Result<Option<Hospital>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_HOSPITAL_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_hospital) {
                    Ok(hospital) => Ok(Some(hospital)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Hospital", id.to_string()))
    }

    async fn search_hospitals(&self, keyword: &str) -> Result<Vec<Hospital>> {
        let keyword = escape_like(keyword);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SEARCH_HOSPITALS_BY_NAME)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&keyword], row_to_hospital)
                    .map_err(wrap_err)?;

                let mut hospitals = Vec::new();
                for row_result in rows {
                    hospitals.push(row_result.map_err(wrap_err)?);
                }
                Ok(hospitals)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_hospital(&self, hospital: &Hospital) -> Result<()> {
        let id = hospital.id.to_string();
        let name = hospital.name.clone();
        let phone = hospital.phone.clone();
        let address = hospital.address.clone();
        let created_at = format_datetime(&hospital.created_at);
        let updated_at = format_datetime(&hospital.updated_at);
        let hospital_id = hospital.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_HOSPITAL,
                    rusqlite::params![id, name, phone, address, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Hospital", hospital_id))
    }
}

#[async_trait]
impl VisitRepository for SqliteRepository {
    async fn get_visit(&self, id: Uuid) -> Result<Option<HospitalVisit>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_VISIT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_visit) {
                    Ok(visit) => Ok(Some(visit)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "HospitalVisit", id.to_string()))
    }

    async fn visits_for_user(&self, user_id: Uuid) -> Result<Vec<HospitalVisit>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_VISITS_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_visit)
                    .map_err(wrap_err)?;

                let mut visits = Vec::new();
                for row_result in rows {
                    visits.push(row_result.map_err(wrap_err)?);
                }
                Ok(visits)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_visit(&self, visit: &HospitalVisit) -> Result<()> {
        let id = visit.id.to_string();
        let user_id = visit.user_id.to_string();
        let hospital_id = visit.hospital_id.to_string();
        let scheduled_at = format_datetime(&visit.scheduled_at);
        let created_at = format_datetime(&visit.created_at);
        let visit_id = visit.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_VISIT,
                    rusqlite::params![id, user_id, hospital_id, scheduled_at, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "HospitalVisit", visit_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medichat_core::domain::MessageSender;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    fn test_user(login_id: &str) -> User {
        User::new(login_id, "Test User", "$argon2id$stub")
    }

    #[tokio::test]
    async fn user_roundtrip_by_id_and_login() {
        let repo = repo().await;
        let user = test_user("jdoe");

        repo.create_user(&user).await.unwrap();

        let by_id = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.login_id, "jdoe");
        assert_eq!(by_id.password_hash, "$argon2id$stub");

        let by_login = repo.get_user_by_login_id("jdoe").await.unwrap().unwrap();
        assert_eq!(by_login.id, user.id);

        let missing = repo.get_user_by_login_id("ghost").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_login_id_maps_to_already_exists() {
        let repo = repo().await;
        repo.create_user(&test_user("jdoe")).await.unwrap();

        let err = repo.create_user(&test_user("jdoe")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn rooms_are_listed_newest_activity_first() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();

        let older = ChatRoom {
            updated_at: chrono::Utc::now() - chrono::Duration::hours(2),
            ..ChatRoom::new(user.id)
        };
        let newer = ChatRoom::new(user.id);
        repo.create_room(&older).await.unwrap();
        repo.create_room(&newer).await.unwrap();

        let rooms = repo.rooms_for_user(user.id).await.unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, newer.id);
        assert_eq!(rooms[1].id, older.id);
    }

    #[tokio::test]
    async fn search_rooms_filters_by_title_keyword() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();

        let asthma = ChatRoom::new(user.id).renamed("Asthma questions");
        let allergy = ChatRoom::new(user.id).renamed("Allergy advice");
        repo.create_room(&asthma).await.unwrap();
        repo.create_room(&allergy).await.unwrap();

        let found = repo.search_rooms(user.id, "Asthma").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, asthma.id);
    }

    #[tokio::test]
    async fn search_rooms_treats_wildcards_as_literals() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();

        let plain = ChatRoom::new(user.id).renamed("Asthma questions");
        let percent = ChatRoom::new(user.id).renamed("100% recovered?");
        repo.create_room(&plain).await.unwrap();
        repo.create_room(&percent).await.unwrap();

        // A bare wildcard only matches titles containing a literal '%'.
        let found = repo.search_rooms(user.id, "%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, percent.id);

        let found = repo.search_rooms(user.id, "_").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn search_rooms_ignores_ascii_case() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();

        let room = ChatRoom::new(user.id).renamed("Asthma questions");
        repo.create_room(&room).await.unwrap();

        let found = repo.search_rooms(user.id, "asthma").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, room.id);
    }

    #[tokio::test]
    async fn update_room_renames_and_missing_room_is_not_found() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();

        let room = ChatRoom::new(user.id);
        repo.create_room(&room).await.unwrap();

        let renamed = room.clone().renamed("Headaches");
        repo.update_room(&renamed).await.unwrap();
        let fetched = repo.get_room(room.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Headaches");

        let ghost = ChatRoom::new(user.id);
        let err = repo.update_room(&ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn messages_are_ordered_and_last_message_wins() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();
        let room = ChatRoom::new(user.id);
        repo.create_room(&room).await.unwrap();

        let first = ChatMessage {
            created_at: chrono::Utc::now() - chrono::Duration::minutes(5),
            ..ChatMessage::new(room.id, user.id, "What is asthma?", MessageSender::User)
        };
        let second = ChatMessage::new(room.id, user.id, "A chronic condition.", MessageSender::Bot);
        repo.create_message(&first).await.unwrap();
        repo.create_message(&second).await.unwrap();

        let messages = repo.messages_for_room(room.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "What is asthma?");
        assert_eq!(messages[1].content, "A chronic condition.");

        let last = repo.last_message_for_room(room.id).await.unwrap().unwrap();
        assert_eq!(last.id, second.id);

        let empty = repo
            .last_message_for_room(Uuid::new_v4())
            .await
            .unwrap();
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn hospital_search_matches_substring_sorted_by_name() {
        let repo = repo().await;
        repo.create_hospital(&Hospital::new("Seoul General Hospital", "02-1234", "Seoul"))
            .await
            .unwrap();
        repo.create_hospital(&Hospital::new("Busan General Hospital", "051-9876", "Busan"))
            .await
            .unwrap();
        repo.create_hospital(&Hospital::new("Eye Clinic", "02-5555", "Seoul"))
            .await
            .unwrap();

        let found = repo.search_hospitals("General").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Busan General Hospital");
        assert_eq!(found[1].name, "Seoul General Hospital");

        let found = repo.search_hospitals("general").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = repo.search_hospitals("%").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn visits_are_listed_soonest_first() {
        let repo = repo().await;
        let user = test_user("jdoe");
        repo.create_user(&user).await.unwrap();
        let hospital = Hospital::new("Seoul General Hospital", "02-1234", "Seoul");
        repo.create_hospital(&hospital).await.unwrap();

        let later = HospitalVisit::new(
            user.id,
            hospital.id,
            chrono::Utc::now() + chrono::Duration::days(7),
        );
        let sooner = HospitalVisit::new(
            user.id,
            hospital.id,
            chrono::Utc::now() + chrono::Duration::days(1),
        );
        repo.create_visit(&later).await.unwrap();
        repo.create_visit(&sooner).await.unwrap();

        let visits = repo.visits_for_user(user.id).await.unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].id, sooner.id);
        assert_eq!(visits[1].id, later.id);

        let fetched = repo.get_visit(sooner.id).await.unwrap().unwrap();
        assert_eq!(fetched.hospital_id, hospital.id);
    }
}
