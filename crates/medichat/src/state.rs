//! Application state with repository-based storage.
//!
//! Shared state passed to all request handlers. Storage is accessed
//! through repository trait objects; the concrete backend is selected
//! at compile time via feature flags.

use std::sync::Arc;

use medichat_auth::AuthState;
use medichat_core::auth::SessionRepository;
use medichat_core::storage::{
    ChatMessageRepository, ChatRoomRepository, HospitalRepository, UserRepository, VisitRepository,
};

use crate::chatbot::ChatClient;

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub rooms: Arc<dyn ChatRoomRepository>,
    pub messages: Arc<dyn ChatMessageRepository>,
    pub hospitals: Arc<dyn HospitalRepository>,
    pub visits: Arc<dyn VisitRepository>,
    /// Client for the external chatbot service.
    pub chat: Arc<dyn ChatClient>,
    /// Session auth state, extracted by the auth middleware and extractors.
    pub auth: AuthState,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    fn build(
        users: Arc<dyn UserRepository>,
        rooms: Arc<dyn ChatRoomRepository>,
        messages: Arc<dyn ChatMessageRepository>,
        hospitals: Arc<dyn HospitalRepository>,
        visits: Arc<dyn VisitRepository>,
        sessions: Arc<dyn SessionRepository>,
        chat: Arc<dyn ChatClient>,
        auth_config: medichat_auth::AuthConfig,
    ) -> Self {
        let auth = AuthState::new(sessions, users.clone(), auth_config);
        Self {
            users,
            rooms,
            messages,
            hospitals,
            visits,
            chat,
            auth,
        }
    }
}

/// Lets the auth extractors pull their state out of the app state.
impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::*;
    use crate::chatbot::HttpChatClient;
    use crate::config::Config;
    use crate::storage::SqliteRepository;
    use medichat_auth::{AuthConfig, SqliteSessionStore};

    impl AppState {
        /// Creates AppState with SQLite storage.
        ///
        /// Repositories and the session store share one database file.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let sessions = Arc::new(SqliteSessionStore::open(&config.sqlite_path).await?);
            let chat = Arc::new(HttpChatClient::new(
                config.chat_service_url.clone(),
                config.chat_timeout(),
            )?);

            Ok(Self::build(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo,
                sessions,
                chat,
                auth_config,
            ))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::chatbot::HttpChatClient;
    use crate::config::Config;
    use crate::storage::InMemoryRepository;
    use medichat_auth::{AuthConfig, InMemorySessionStore};

    impl AppState {
        /// Creates AppState with in-memory storage.
        ///
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let sessions = Arc::new(InMemorySessionStore::new());
            let chat = Arc::new(HttpChatClient::new(
                config.chat_service_url.clone(),
                config.chat_timeout(),
            )?);

            Ok(Self::build(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo,
                sessions,
                chat,
                auth_config,
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================
