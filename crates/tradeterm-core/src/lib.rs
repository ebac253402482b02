//! Domain model and turn workflow for the trading term explainer.
//!
//! This crate performs no file or network I/O. Collaborators are reached
//! through [`chat::ChatBackend`], [`session_log::LogSink`] and
//! [`random::RandomSource`].

pub mod chat;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod persona;
pub mod random;
pub mod resolver;
pub mod secret;
pub mod session_log;
pub mod text;

#[cfg(test)]
mod test_support;

pub use chat::{ChatBackend, ChatError, ConversationSession, Reply};
pub use context::SessionContext;
pub use dispatcher::{DispatchOutcome, Flow, dispatch};
pub use error::{Result, TradetermError};
pub use knowledge::{KnowledgeBase, TermRecord};
pub use message::{DisplayMessage, DisplayRole, SpeakerType, UiMessage};
pub use persona::{ChatTurn, PersonaTemplate, TurnRole};
pub use resolver::{resolve, resolve_with_key};
pub use session_log::{LogSink, LogSpeaker, MemoryLogSink, SessionLog};
