//! HTTP client for the chatbot backend.
//!
//! The chatbot runs as a separate service. We send it the user's question
//! and get back a single answer string.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the chatbot service.
#[derive(Debug, Error)]
pub enum ChatClientError {
    #[error("chat service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat service returned status {0}")]
    BadStatus(u16),

    #[error("chat service returned an empty answer")]
    EmptyAnswer,
}

/// Abstraction over the chatbot backend, so handlers can be tested
/// without a running service.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends a question and returns the bot's answer.
    async fn ask(&self, question: &str) -> Result<String, ChatClientError>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

/// Chatbot client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    /// Creates a client for the service at `base_url` with the given
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn ask(&self, question: &str) -> Result<String, ChatClientError> {
        let url = format!("{}/ask", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatClientError::BadStatus(response.status().as_u16()));
        }

        let body: AskResponse = response.json().await?;
        if body.answer.trim().is_empty() {
            return Err(ChatClientError::EmptyAnswer);
        }

        Ok(body.answer)
    }
}
