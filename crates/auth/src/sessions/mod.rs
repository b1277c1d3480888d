//! Session storage backends.

pub mod inmemory;
pub mod sqlite;

pub use inmemory::InMemorySessionStore;
pub use sqlite::SqliteSessionStore;
