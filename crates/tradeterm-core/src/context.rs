//! Explicit per-session state passed into every operation.

use crate::chat::{ChatBackend, ConversationSession};
use crate::knowledge::KnowledgeBase;
use crate::message::DisplayMessage;
use crate::persona::{ChatTurn, PersonaTemplate};
use crate::random::{RandomSource, StdRandomSource};
use crate::session_log::SessionLog;
use std::sync::Arc;

/// Everything a single interactive session owns.
///
/// Nothing in here is shared with other sessions except the immutable
/// persona template.
pub struct SessionContext {
    pub(crate) knowledge: KnowledgeBase,
    pub(crate) template: Arc<PersonaTemplate>,
    pub(crate) conversation: ConversationSession,
    pub(crate) help_text: String,
    pub(crate) log: SessionLog,
    pub(crate) transcript: Vec<DisplayMessage>,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) ended: bool,
}

impl SessionContext {
    /// Starts a conversation from `template` and seeds the transcript with
    /// its greeting, if any.
    pub fn new(
        knowledge: KnowledgeBase,
        template: Arc<PersonaTemplate>,
        backend: Arc<dyn ChatBackend>,
        help_text: impl Into<String>,
        log: SessionLog,
    ) -> Self {
        let conversation = ConversationSession::start(backend, &template);
        let transcript = template
            .greeting()
            .map(|greeting| vec![DisplayMessage::assistant(greeting)])
            .unwrap_or_default();

        Self {
            knowledge,
            template,
            conversation,
            help_text: help_text.into(),
            log,
            transcript,
            rng: Box::new(StdRandomSource::new()),
            ended: false,
        }
    }

    /// Replaces the random source used by `/random_term`.
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn template(&self) -> &Arc<PersonaTemplate> {
        &self.template
    }

    pub fn history(&self) -> &[ChatTurn] {
        self.conversation.history()
    }

    pub fn transcript(&self) -> &[DisplayMessage] {
        &self.transcript
    }

    pub fn model_name(&self) -> &str {
        self.conversation.model_name()
    }

    /// Where the session log is written, e.g. its file path.
    pub fn log_location(&self) -> String {
        self.log.location()
    }

    /// Whether `quit` has been processed.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}
