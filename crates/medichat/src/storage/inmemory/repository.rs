//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use medichat_core::domain::{ChatMessage, ChatRoom, Hospital, HospitalVisit, User};
use medichat_core::storage::{
    ChatMessageRepository, ChatRoomRepository, HospitalRepository, RepositoryError, Result,
    UserRepository, VisitRepository,
};

/// In-memory storage backend for development and testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    rooms: Arc<RwLock<HashMap<Uuid, ChatRoom>>>,
    messages: Arc<RwLock<HashMap<Uuid, ChatMessage>>>,
    hospitals: Arc<RwLock<HashMap<Uuid, Hospital>>>,
    visits: Arc<RwLock<HashMap<Uuid, HospitalVisit>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RwLock::new(HashMap::new())),
            messages: Arc::new(RwLock::new(HashMap::new())),
            hospitals: Arc::new(RwLock::new(HashMap::new())),
            visits: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_login_id(&self, login_id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.login_id == login_id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.login_id == user.login_id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.login_id.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryRepository {
    async fn get_room(&self, id: Uuid) -> Result<Option<ChatRoom>> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(&id).cloned())
    }

    async fn rooms_for_user(&self, user_id: Uuid) -> Result<Vec<ChatRoom>> {
        let rooms = self.rooms.read().await;
        let mut result: Vec<ChatRoom> = rooms
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    async fn search_rooms(&self, user_id: Uuid, keyword: &str) -> Result<Vec<ChatRoom>> {
        // ASCII case-insensitive, matching the SQLite backend's LIKE.
        let needle = keyword.to_ascii_lowercase();
        let rooms = self.rooms.read().await;
        let mut result: Vec<ChatRoom> = rooms
            .values()
            .filter(|r| r.user_id == user_id && r.title.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    async fn create_room(&self, room: &ChatRoom) -> Result<()> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "ChatRoom",
                id: room.id.to_string(),
            });
        }
        rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn update_room(&self, room: &ChatRoom) -> Result<()> {
        let mut rooms = self.rooms.write().await;
        if !rooms.contains_key(&room.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "ChatRoom",
                id: room.id.to_string(),
            });
        }
        rooms.insert(room.id, room.clone());
        Ok(())
    }
}

#[async_trait]
impl ChatMessageRepository for InMemoryRepository {
    async fn messages_for_room(&self, room_id: Uuid) -> Result<Vec<ChatMessage>> {
        let messages = self.messages.read().await;
        let mut result: Vec<ChatMessage> = messages
            .values()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn last_message_for_room(&self, room_id: Uuid) -> Result<Option<ChatMessage>> {
        let messages = self.messages.read().await;
        Ok(messages
            .values()
            .filter(|m| m.room_id == room_id)
            .max_by_key(|m| m.created_at)
            .cloned())
    }

    async fn create_message(&self, message: &ChatMessage) -> Result<()> {
        let mut messages = self.messages.write().await;
        messages.insert(message.id, message.clone());
        Ok(())
    }
}

#[async_trait]
impl HospitalRepository for InMemoryRepository {
    async fn get_hospital(&self, id: Uuid) -> Result<Option<Hospital>> {
        let hospitals = self.hospitals.read().await;
        Ok(hospitals.get(&id).cloned())
    }

    async fn search_hospitals(&self, keyword: &str) -> Result<Vec<Hospital>> {
        let needle = keyword.to_ascii_lowercase();
        let hospitals = self.hospitals.read().await;
        let mut result: Vec<Hospital> = hospitals
            .values()
            .filter(|h| h.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create_hospital(&self, hospital: &Hospital) -> Result<()> {
        let mut hospitals = self.hospitals.write().await;
        if hospitals.contains_key(&hospital.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Hospital",
                id: hospital.id.to_string(),
            });
        }
        hospitals.insert(hospital.id, hospital.clone());
        Ok(())
    }
}

#[async_trait]
impl VisitRepository for InMemoryRepository {
    async fn get_visit(&self, id: Uuid) -> Result<Option<HospitalVisit>> {
        let visits = self.visits.read().await;
        Ok(visits.get(&id).cloned())
    }

    async fn visits_for_user(&self, user_id: Uuid) -> Result<Vec<HospitalVisit>> {
        let visits = self.visits.read().await;
        let mut result: Vec<HospitalVisit> = visits
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(result)
    }

    async fn create_visit(&self, visit: &HospitalVisit) -> Result<()> {
        let mut visits = self.visits.write().await;
        visits.insert(visit.id, visit.clone());
        Ok(())
    }
}
