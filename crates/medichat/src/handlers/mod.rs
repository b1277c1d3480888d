pub mod authz;
pub mod chat;
pub mod chat_rooms;
pub mod error;
pub mod health;
pub mod hospitals;

pub use error::AppError;
