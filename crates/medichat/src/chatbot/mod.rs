//! Client for the external chatbot service.

mod client;

pub use client::{ChatClient, ChatClientError, HttpChatClient};
