//! Remote chat session abstraction.
//!
//! [`ChatBackend`] is the seam to the hosted model; [`ConversationSession`]
//! owns the conversation history and appends to it only on a successful,
//! non-empty reply.

use crate::persona::{ChatTurn, PersonaTemplate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Reply from the remote model.
///
/// `text` is absent when the upstream filtered or blocked the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: Option<String>,
    /// Prompt feedback or finish-reason metadata, rendered as text.
    pub feedback: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            feedback: None,
        }
    }

    pub fn blocked(feedback: Option<String>) -> Self {
        Self {
            text: None,
            feedback,
        }
    }

    /// Reply text when present and not blank.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }
}

/// Failure while sending a prompt to the remote model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The request never produced an HTTP response
    #[error("request failed: {message}")]
    Transport { message: String, retryable: bool },

    /// The service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retryable: bool,
    },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ChatError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } | Self::Http { retryable, .. } => *retryable,
            Self::Decode(_) => false,
        }
    }
}

/// A hosted chat model.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier, for the log header and diagnostics.
    fn model_name(&self) -> &str;

    /// Generates a reply to `prompt` given the prior `history`.
    ///
    /// Implementations must not retain or mutate the history.
    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> Result<Reply, ChatError>;
}

/// Stateful handle over a remote conversation.
pub struct ConversationSession {
    backend: Arc<dyn ChatBackend>,
    history: Vec<ChatTurn>,
}

impl ConversationSession {
    /// Starts a session seeded with a copy of the template turns.
    pub fn start(backend: Arc<dyn ChatBackend>, template: &PersonaTemplate) -> Self {
        Self {
            backend,
            history: template.turns().to_vec(),
        }
    }

    /// Discards the current history and reseeds it from `template`.
    pub fn restart(&mut self, template: &PersonaTemplate) {
        self.history = template.turns().to_vec();
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Sends `prompt` and, on a reply with text, appends the user/model turn pair.
    ///
    /// Failed sends and blocked replies leave the history unchanged.
    pub async fn send(&mut self, prompt: &str) -> Result<Reply, ChatError> {
        let reply = self.backend.generate(&self.history, prompt).await?;
        if let Some(text) = reply.usable_text() {
            self.history.push(ChatTurn::user(prompt));
            self.history.push(ChatTurn::model(text));
        } else {
            tracing::debug!("reply carried no text; history left unchanged");
        }
        Ok(reply)
    }
}
