//! Session authentication for medichat.
//!
//! This crate provides:
//! - Credential verification (argon2id password hashing)
//! - Session storage (in-memory or SQLite)
//! - Register/login/logout routes
//! - Axum extractors for authentication

mod config;
mod error;
mod extractors;
mod handlers;
pub mod password;
mod sessions;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentUser, OptionalUser};
pub use handlers::{auth_routes, LoginRequest, LoginResponse, RegisterRequest, UserDto};
pub use sessions::{InMemorySessionStore, SqliteSessionStore};
pub use state::AuthState;
