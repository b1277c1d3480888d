//! SQLite-backed session storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use medichat_core::auth::{AuthError, Result, Session, SessionId, SessionRepository};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id);
";

/// Session store backed by a SQLite database.
///
/// Timestamps are stored as RFC 3339 strings so rows stay readable with
/// the sqlite3 CLI.
#[derive(Clone)]
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        Self::init(conn).await
    }

    /// Opens an in-memory database, mainly for tests.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, tokio_rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            ))
        })
}

#[async_trait]
impl SessionRepository for SqliteSessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        let session = session.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO sessions (id, user_id, created_at, expires_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    (
                        session.id.as_str(),
                        &session.user_id,
                        session.created_at.to_rfc3339(),
                        session.expires_at.to_rfc3339(),
                    ),
                )?;
                Ok(())
            })
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let id = id.clone();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?1",
                )?;
                let mut rows = stmt.query([id.as_str()])?;
                match rows.next()? {
                    Some(row) => {
                        let created_at: String = row.get(2)?;
                        let expires_at: String = row.get(3)?;
                        Ok(Some(Session {
                            id: SessionId::new(row.get(0)?),
                            user_id: row.get(1)?,
                            created_at: parse_timestamp(&created_at)?,
                            expires_at: parse_timestamp(&expires_at)?,
                        }))
                    }
                    None => Ok(None),
                }
            })
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM sessions WHERE id = ?1", [id.as_str()])?;
                Ok(())
            })
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn delete_user_sessions(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM sessions WHERE user_id = ?1", [user_id])?;
                Ok(())
            })
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}
