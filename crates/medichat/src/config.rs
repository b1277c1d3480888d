use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "medichat.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Base URL of the external chatbot service (default: "http://localhost:8000")
    pub chat_service_url: String,
    /// Chatbot request timeout in seconds (default: 30)
    pub chat_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "medichat.db")
    /// - `CHAT_SERVICE_URL` - Chatbot service base URL (default: "http://localhost:8000")
    /// - `CHAT_TIMEOUT_SECONDS` - Chatbot request timeout (default: 30)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "medichat.db".to_string()),
            chat_service_url: env::var("CHAT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            chat_timeout_seconds: env::var("CHAT_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Get the chatbot request timeout as a Duration.
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
