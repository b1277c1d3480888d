//! SQLite schema definitions and SQL query constants.
//!
//! All SQL statements used by the SQLite repository live here as pure
//! constants, separate from the I/O code.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    login_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Chat rooms table
CREATE TABLE IF NOT EXISTS chat_rooms (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Chat messages table
CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    room_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    sender TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (room_id) REFERENCES chat_rooms(id) ON DELETE CASCADE
);

-- Hospitals table
CREATE TABLE IF NOT EXISTS hospitals (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Hospital visits table
CREATE TABLE IF NOT EXISTS hospital_visits (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    hospital_id TEXT NOT NULL,
    scheduled_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (hospital_id) REFERENCES hospitals(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_users_login_id ON users(login_id);
CREATE INDEX IF NOT EXISTS idx_chat_rooms_user_id ON chat_rooms(user_id);
CREATE INDEX IF NOT EXISTS idx_chat_messages_room_id ON chat_messages(room_id);
CREATE INDEX IF NOT EXISTS idx_chat_messages_room_created ON chat_messages(room_id, created_at);
CREATE INDEX IF NOT EXISTS idx_hospitals_name ON hospitals(name);
CREATE INDEX IF NOT EXISTS idx_hospital_visits_user_id ON hospital_visits(user_id);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, login_id, name, password_hash, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, login_id, name, password_hash, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_LOGIN_ID: &str = r#"
SELECT id, login_id, name, password_hash, created_at, updated_at
FROM users
WHERE login_id = ?1
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET login_id = ?2, name = ?3, password_hash = ?4, updated_at = ?5
WHERE id = ?1
"#;

// Chat room queries
pub const INSERT_ROOM: &str = r#"
INSERT INTO chat_rooms (id, user_id, title, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_ROOM_BY_ID: &str = r#"
SELECT id, user_id, title, created_at, updated_at
FROM chat_rooms
WHERE id = ?1
"#;

pub const SELECT_ROOMS_BY_USER: &str = r#"
SELECT id, user_id, title, created_at, updated_at
FROM chat_rooms
WHERE user_id = ?1
ORDER BY updated_at DESC
"#;

// The bound keyword has `%`/`_`/`\` pre-escaped; see `escape_like`.
pub const SEARCH_ROOMS_BY_TITLE: &str = r#"
SELECT id, user_id, title, created_at, updated_at
FROM chat_rooms
WHERE user_id = ?1 AND title LIKE '%' || ?2 || '%' ESCAPE '\'
ORDER BY updated_at DESC
"#;

pub const UPDATE_ROOM: &str = r#"
UPDATE chat_rooms
SET title = ?2, updated_at = ?3
WHERE id = ?1
"#;

// Chat message queries
pub const INSERT_MESSAGE: &str = r#"
INSERT INTO chat_messages (id, room_id, user_id, content, sender, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_MESSAGES_BY_ROOM: &str = r#"
SELECT id, room_id, user_id, content, sender, created_at
FROM chat_messages
WHERE room_id = ?1
ORDER BY created_at ASC
"#;

pub const SELECT_LAST_MESSAGE_BY_ROOM: &str = r#"
SELECT id, room_id, user_id, content, sender, created_at
FROM chat_messages
WHERE room_id = ?1
ORDER BY created_at DESC
LIMIT 1
"#;

// Hospital queries
pub const INSERT_HOSPITAL: &str = r#"
INSERT INTO hospitals (id, name, phone, address, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_HOSPITAL_BY_ID: &str = r#"
SELECT id, name, phone, address, created_at, updated_at
FROM hospitals
WHERE id = ?1
"#;

// The bound keyword has `%`/`_`/`\` pre-escaped; see `escape_like`.
pub const SEARCH_HOSPITALS_BY_NAME: &str = r#"
SELECT id, name, phone, address, created_at, updated_at
FROM hospitals
WHERE name LIKE '%' || ?1 || '%' ESCAPE '\'
ORDER BY name ASC
"#;

// Hospital visit queries
pub const INSERT_VISIT: &str = r#"
INSERT INTO hospital_visits (id, user_id, hospital_id, scheduled_at, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_VISIT_BY_ID: &str = r#"
SELECT id, user_id, hospital_id, scheduled_at, created_at
FROM hospital_visits
WHERE id = ?1
"#;

pub const SELECT_VISITS_BY_USER: &str = r#"
SELECT id, user_id, hospital_id, scheduled_at, created_at
FROM hospital_visits
WHERE user_id = ?1
ORDER BY scheduled_at ASC
"#;
