//! Query resolution: local knowledge first, the remote model always.

use crate::chat::{ChatError, ConversationSession, Reply};
use crate::knowledge::KnowledgeBase;
use crate::message::UiMessage;
use crate::persona::PersonaTemplate;
use crate::session_log::{LogSpeaker, SessionLog, TURN_SEPARATOR};
use crate::text::title_case;

const TERM_PREFIXES: [&str; 2] = ["what is ", "explain "];

pub const BLOCKED_PLACEHOLDER: &str = "[LLM Response blocked or contained no valid text content]";
pub const RETRY_ADVICE: &str = "Please check your input or try again.";
pub const TRANSIENT_ADVICE: &str =
    "The chat service seems busy or unreachable. Please try again in a moment.";

/// Derives the lower-cased knowledge-base key for `raw_query`.
///
/// A leading "what is " or "explain " (any casing) is stripped and the
/// remaining words are rejoined with single spaces; otherwise the whole
/// query is used.
pub fn lookup_key(raw_query: &str) -> String {
    let lowered = raw_query.trim().to_lowercase();
    for prefix in TERM_PREFIXES {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            return rest.split_whitespace().collect::<Vec<_>>().join(" ");
        }
    }
    lowered
}

/// Prompt asking the model to elaborate on a local definition in persona.
pub fn elaboration_prompt(display_term: &str, definition: &str, instruction: &str) -> String {
    format!(
        "The user asked about '{display_term}'. My local knowledge says: '{definition}'. {instruction}"
    )
    .trim_end()
    .to_string()
}

fn local_definition_message(display_term: &str, definition: &str) -> String {
    format!("From my local knowledge: {display_term} is defined as - \"{definition}\".")
}

/// Advice shown after a failed send.
pub fn retry_advice(error: &ChatError) -> &'static str {
    if error.is_retryable() {
        TRANSIENT_ADVICE
    } else {
        RETRY_ADVICE
    }
}

fn reply_message(reply: &Reply) -> String {
    match reply.usable_text() {
        Some(text) => text.to_string(),
        None => {
            let mut text = BLOCKED_PLACEHOLDER.to_string();
            if let Some(feedback) = reply.feedback.as_deref().filter(|f| !f.is_empty()) {
                text.push_str("\nPrompt Feedback: ");
                text.push_str(feedback);
            }
            text
        }
    }
}

/// Resolves one query into UI messages.
///
/// On a knowledge-base hit a `local` message is emitted and the model is
/// asked to elaborate; otherwise the raw text goes to the model unchanged.
/// Every emitted message is logged in order. A failed send yields a
/// `system_error` message followed by a `system_info` retry hint.
pub async fn resolve(
    raw_query: &str,
    conversation: &mut ConversationSession,
    knowledge: &KnowledgeBase,
    template: &PersonaTemplate,
    log: &mut SessionLog,
) -> Vec<UiMessage> {
    let key = lookup_key(raw_query);
    resolve_with_key(raw_query, &key, conversation, knowledge, template, log).await
}

/// Like [`resolve`], with the knowledge-base key given by the caller
/// instead of derived from `raw_query`.
pub async fn resolve_with_key(
    raw_query: &str,
    key: &str,
    conversation: &mut ConversationSession,
    knowledge: &KnowledgeBase,
    template: &PersonaTemplate,
    log: &mut SessionLog,
) -> Vec<UiMessage> {
    let mut messages = Vec::new();

    let prompt = match knowledge.lookup(key) {
        Some(definition) => {
            let display_term = title_case(key);
            tracing::debug!("local knowledge hit for '{}'", key);

            let local = local_definition_message(&display_term, definition);
            log.says(LogSpeaker::AgentLocal, &local);
            messages.push(UiMessage::local(local));

            elaboration_prompt(&display_term, definition, template.elaboration_instruction())
        }
        None => raw_query.to_string(),
    };

    match conversation.send(&prompt).await {
        Ok(reply) => {
            if reply.usable_text().is_none() {
                tracing::warn!("model reply was blocked or empty");
            }
            let text = reply_message(&reply);
            log.says(LogSpeaker::AgentLlm, &text);
            log.line(TURN_SEPARATOR);
            messages.push(UiMessage::llm(text));
        }
        Err(e) => {
            tracing::warn!("chat request failed: {}", e);
            let error = format!("An error occurred sending message or generating content: {e}");
            let advice = retry_advice(&e);
            log.says(LogSpeaker::SystemError, &error);
            log.says(LogSpeaker::System, advice);
            log.line(TURN_SEPARATOR);
            messages.push(UiMessage::error(error));
            messages.push(UiMessage::info(advice));
        }
    }

    messages
}
