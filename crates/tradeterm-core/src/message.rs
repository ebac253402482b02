//! Display-only message types handed to the presentation layer.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Originating speaker of a UI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpeakerType {
    /// Answer taken from the local knowledge base
    Local,
    /// Reply from the remote model
    Llm,
    /// System notice or command output
    SystemInfo,
    /// Recoverable failure reported to the user
    SystemError,
}

/// Ephemeral message produced by a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiMessage {
    pub speaker_type: SpeakerType,
    pub text: String,
}

impl UiMessage {
    pub fn new(speaker_type: SpeakerType, text: impl Into<String>) -> Self {
        Self {
            speaker_type,
            text: text.into(),
        }
    }

    pub fn local(text: impl Into<String>) -> Self {
        Self::new(SpeakerType::Local, text)
    }

    pub fn llm(text: impl Into<String>) -> Self {
        Self::new(SpeakerType::Llm, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(SpeakerType::SystemInfo, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(SpeakerType::SystemError, text)
    }
}

/// Role of a record in the displayed transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayRole {
    User,
    Assistant,
}

/// A record of the displayed transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub role: DisplayRole,
    pub content: String,
}

impl DisplayMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: DisplayRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: DisplayRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&UiMessage> for DisplayMessage {
    fn from(message: &UiMessage) -> Self {
        Self::assistant(message.text.clone())
    }
}
