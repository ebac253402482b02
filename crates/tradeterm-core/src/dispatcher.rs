//! Command dispatch over a [`SessionContext`].

use crate::command::Command;
use crate::context::SessionContext;
use crate::message::{DisplayMessage, UiMessage};
use crate::resolver::{resolve, resolve_with_key};
use crate::session_log::{COMMAND_SEPARATOR, LogSpeaker, SESSION_RULE, TURN_SEPARATOR};
use crate::text::title_case;

pub const GOODBYE: &str = "Goodbye! Hope this was helpful.";
pub const RESET_FALLBACK: &str = "Conversation reset by user.";
pub const TERMS_HEADER: &str = "I have predefined definitions for these terms:";
pub const TERMS_EMPTY: &str = "My local knowledge base of terms is currently empty.";
pub const RANDOM_EMPTY: &str = "My local knowledge base is empty, so I can't pick a random term.";
pub const SESSION_ENDED: &str = "Chat session ended. Restart the application to begin a new session.";

/// Whether the interactive loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Result of dispatching one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub messages: Vec<UiMessage>,
    pub flow: Flow,
}

impl DispatchOutcome {
    fn continue_with(messages: Vec<UiMessage>) -> Self {
        Self {
            messages,
            flow: Flow::Continue,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.flow == Flow::Exit
    }
}

/// Formats the `/my_terms` listing, or the empty notice.
pub fn terms_listing(terms: &[String]) -> String {
    if terms.is_empty() {
        return TERMS_EMPTY.to_string();
    }
    let mut listing = TERMS_HEADER.to_string();
    for term in terms {
        listing.push_str("\n- ");
        listing.push_str(term);
    }
    listing
}

/// Handles one line of user input.
///
/// The input is recorded in the transcript and the log before dispatch;
/// every produced message is appended to the transcript afterwards.
pub async fn dispatch(ctx: &mut SessionContext, raw: &str) -> DispatchOutcome {
    if ctx.ended {
        return DispatchOutcome {
            messages: vec![UiMessage::info(SESSION_ENDED)],
            flow: Flow::Exit,
        };
    }

    ctx.transcript.push(DisplayMessage::user(raw));
    ctx.log.says(LogSpeaker::User, raw);

    let command = Command::parse(raw);
    if let Some(token) = command.token() {
        ctx.log.line(&format!("--- User typed {token} ---"));
        tracing::debug!("dispatching {}", token);
    }

    let outcome = match command {
        Command::Quit(_) => quit(ctx),
        Command::Reset => DispatchOutcome::continue_with(reset(ctx)),
        Command::Help => DispatchOutcome::continue_with(help(ctx)),
        Command::MyTerms => DispatchOutcome::continue_with(my_terms(ctx)),
        Command::RandomTerm => DispatchOutcome::continue_with(random_term(ctx).await),
        Command::Query => DispatchOutcome::continue_with(
            resolve(
                raw,
                &mut ctx.conversation,
                &ctx.knowledge,
                &ctx.template,
                &mut ctx.log,
            )
            .await,
        ),
    };

    ctx.transcript
        .extend(outcome.messages.iter().map(DisplayMessage::from));
    outcome
}

fn quit(ctx: &mut SessionContext) -> DispatchOutcome {
    ctx.log.says(LogSpeaker::Agent, GOODBYE);
    ctx.log.line(COMMAND_SEPARATOR);
    let ended_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    ctx.log.says(LogSpeaker::System, &format!("Chat ended: {ended_at}"));
    ctx.log.line(SESSION_RULE);
    ctx.ended = true;
    tracing::info!("session ended by user");

    DispatchOutcome {
        messages: vec![UiMessage::info(GOODBYE)],
        flow: Flow::Exit,
    }
}

fn reset(ctx: &mut SessionContext) -> Vec<UiMessage> {
    ctx.conversation.restart(&ctx.template);
    ctx.transcript.clear();

    let greeting = ctx.template.greeting().unwrap_or(RESET_FALLBACK).to_string();
    ctx.log.says(LogSpeaker::Agent, &greeting);
    ctx.log.line(COMMAND_SEPARATOR);
    tracing::info!("conversation reset");

    vec![UiMessage::info(greeting)]
}

fn help(ctx: &mut SessionContext) -> Vec<UiMessage> {
    ctx.log.says(LogSpeaker::System, "Displayed help message.");
    ctx.log.line(TURN_SEPARATOR);
    vec![UiMessage::info(ctx.help_text.clone())]
}

fn my_terms(ctx: &mut SessionContext) -> Vec<UiMessage> {
    let listing = terms_listing(&ctx.knowledge.list_terms());
    ctx.log.says(LogSpeaker::Agent, &listing);
    ctx.log.line(TURN_SEPARATOR);
    vec![UiMessage::info(listing)]
}

async fn random_term(ctx: &mut SessionContext) -> Vec<UiMessage> {
    let picked = ctx
        .knowledge
        .pick_random(ctx.rng.as_mut())
        .map(str::to_string);

    let messages = match picked {
        Some(key) => {
            let display_term = title_case(&key);
            let selection = format!("Okay, let's talk about: '{display_term}'");
            ctx.log.says(LogSpeaker::Agent, &selection);

            let mut messages = vec![UiMessage::info(selection)];
            messages.extend(
                resolve_with_key(
                    &display_term,
                    &key,
                    &mut ctx.conversation,
                    &ctx.knowledge,
                    &ctx.template,
                    &mut ctx.log,
                )
                .await,
            );
            messages
        }
        None => {
            ctx.log.says(LogSpeaker::Agent, RANDOM_EMPTY);
            vec![UiMessage::info(RANDOM_EMPTY)]
        }
    };

    ctx.log.line(COMMAND_SEPARATOR);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatError, Reply};
    use crate::knowledge::{KnowledgeBase, TermRecord};
    use crate::message::SpeakerType;
    use crate::persona::{ChatTurn, PersonaTemplate};
    use crate::random::{FixedRandomSource, RandomSource};
    use crate::session_log::{MemoryLogSink, SessionLog};
    use crate::test_support::ScriptedBackend;
    use std::sync::Arc;

    const HELP: &str = "Ask about any trading term.\nCommands: /help /my_terms /random_term /reset quit";

    struct PanickingSource;

    impl RandomSource for PanickingSource {
        fn pick_index(&mut self, _len: usize) -> usize {
            panic!("random source must not be consulted");
        }
    }

    fn template() -> Arc<PersonaTemplate> {
        Arc::new(PersonaTemplate::new(vec![
            ChatTurn::user("You are a patient trading tutor."),
            ChatTurn::model("Hello! Which term shall we explore?"),
        ]))
    }

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::build(vec![
            TermRecord::new("Pip", "Price Interest Point..."),
            TermRecord::new("Leverage", "Using borrowed funds"),
        ])
    }

    fn context(
        knowledge: KnowledgeBase,
        script: Vec<Result<Reply, ChatError>>,
    ) -> (SessionContext, Arc<ScriptedBackend>, MemoryLogSink) {
        let backend = ScriptedBackend::new(script);
        let (log, sink) = SessionLog::in_memory();
        let ctx = SessionContext::new(knowledge, template(), backend.clone(), HELP, log);
        (ctx, backend, sink)
    }

    #[tokio::test]
    async fn test_what_is_pip_scenario() {
        let (mut ctx, _backend, _sink) =
            context(knowledge(), vec![Ok(Reply::text("Pips measure moves."))]);

        let outcome = dispatch(&mut ctx, "What is Pip").await;

        assert_eq!(outcome.flow, Flow::Continue);
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.messages[0].speaker_type, SpeakerType::Local);
        assert!(outcome.messages[0].text.contains("Pip"));
        assert!(outcome.messages[0].text.contains("Price Interest Point..."));
        let llm_count = outcome
            .messages
            .iter()
            .filter(|m| m.speaker_type == SpeakerType::Llm)
            .count();
        assert_eq!(llm_count, 1);
    }

    #[tokio::test]
    async fn test_help_dispatches_case_insensitively_and_is_idempotent() {
        let (mut ctx, backend, _sink) = context(knowledge(), Vec::new());

        let mut texts = Vec::new();
        for raw in ["/HELP", "/Help", "/help"] {
            let outcome = dispatch(&mut ctx, raw).await;
            assert_eq!(outcome.messages, vec![UiMessage::info(HELP)]);
            texts.push(outcome.messages[0].text.clone());
        }

        assert_eq!(texts[0].as_bytes(), texts[1].as_bytes());
        assert_eq!(texts[1].as_bytes(), texts[2].as_bytes());
        assert!(backend.calls().is_empty());
        assert_eq!(ctx.history(), ctx.template().turns());
    }

    #[tokio::test]
    async fn test_help_logs_marker_and_separator() {
        let (mut ctx, _backend, sink) = context(knowledge(), Vec::new());
        dispatch(&mut ctx, "/help").await;

        assert_eq!(
            sink.lines(),
            vec![
                "User: /help".to_string(),
                "--- User typed /help ---".to_string(),
                "System: Displayed help message.".to_string(),
                TURN_SEPARATOR.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_my_terms_lists_title_cased_terms() {
        let (mut ctx, _backend, _sink) = context(knowledge(), Vec::new());
        let outcome = dispatch(&mut ctx, "/my_terms").await;

        assert_eq!(
            outcome.messages[0].text,
            "I have predefined definitions for these terms:\n- Leverage\n- Pip"
        );
    }

    #[tokio::test]
    async fn test_my_terms_empty() {
        let (mut ctx, _backend, _sink) = context(KnowledgeBase::default(), Vec::new());
        let outcome = dispatch(&mut ctx, "/MY_TERMS").await;
        assert_eq!(outcome.messages, vec![UiMessage::info(TERMS_EMPTY)]);
    }

    #[tokio::test]
    async fn test_reset_restores_template_history() {
        let (mut ctx, _backend, sink) =
            context(knowledge(), vec![Ok(Reply::text("First answer."))]);

        dispatch(&mut ctx, "what is a spread").await;
        assert_eq!(ctx.history().len(), 4);

        let outcome = dispatch(&mut ctx, "/reset").await;

        assert_eq!(ctx.history(), ctx.template().turns());
        assert_eq!(
            outcome.messages,
            vec![UiMessage::info("Hello! Which term shall we explore?")]
        );
        assert_eq!(
            ctx.transcript(),
            &[DisplayMessage::assistant("Hello! Which term shall we explore?")]
        );
        assert!(sink.contents().contains("--- User typed /reset ---"));
    }

    #[tokio::test]
    async fn test_reset_without_greeting_uses_fallback() {
        let backend = ScriptedBackend::new(Vec::new());
        let (log, _sink) = SessionLog::in_memory();
        let template = Arc::new(PersonaTemplate::new(vec![ChatTurn::user("Be terse.")]));
        let mut ctx = SessionContext::new(knowledge(), template, backend, HELP, log);

        assert!(ctx.transcript().is_empty());
        let outcome = dispatch(&mut ctx, "/reset").await;
        assert_eq!(outcome.messages, vec![UiMessage::info(RESET_FALLBACK)]);
    }

    #[tokio::test]
    async fn test_random_term_uses_injected_source() {
        let (ctx, backend, sink) =
            context(knowledge(), vec![Ok(Reply::text("Pips are tiny."))]);
        let mut ctx = ctx.with_random_source(Box::new(FixedRandomSource(1)));

        let outcome = dispatch(&mut ctx, "/random_term").await;

        assert_eq!(
            outcome.messages[0],
            UiMessage::info("Okay, let's talk about: 'Pip'")
        );
        assert_eq!(outcome.messages[1].speaker_type, SpeakerType::Local);
        assert_eq!(outcome.messages[2], UiMessage::llm("Pips are tiny."));
        assert!(backend.calls()[0].prompt.starts_with("The user asked about 'Pip'."));

        let lines = sink.lines();
        assert_eq!(lines[1], "--- User typed /random_term ---");
        assert_eq!(lines.last().map(String::as_str), Some(COMMAND_SEPARATOR));
    }

    #[tokio::test]
    async fn test_random_term_always_hits_the_picked_entry() {
        for term in ["Pip ", "  Margin Call", "Explain Like I'm Five", "What is a Pip"] {
            let kb = KnowledgeBase::build(vec![TermRecord::new(term, "Local definition")]);
            let (ctx, backend, _sink) = context(kb, vec![Ok(Reply::text("More detail."))]);
            let mut ctx = ctx.with_random_source(Box::new(FixedRandomSource(0)));

            let outcome = dispatch(&mut ctx, "/random_term").await;

            let kinds: Vec<SpeakerType> =
                outcome.messages.iter().map(|m| m.speaker_type).collect();
            assert_eq!(
                kinds,
                vec![SpeakerType::SystemInfo, SpeakerType::Local, SpeakerType::Llm],
                "term {term:?}"
            );
            assert!(outcome.messages[1].text.contains("Local definition"));
            assert!(backend.calls()[0].prompt.contains("Local definition"));
        }
    }

    #[tokio::test]
    async fn test_exit_marker_names_the_typed_word() {
        let (mut ctx, _backend, sink) = context(knowledge(), Vec::new());
        dispatch(&mut ctx, " EXIT ").await;
        assert_eq!(sink.lines()[1], "--- User typed exit ---");
    }

    #[tokio::test]
    async fn test_random_term_on_empty_kb_never_picks() {
        let (ctx, backend, _sink) = context(KnowledgeBase::default(), Vec::new());
        let mut ctx = ctx.with_random_source(Box::new(PanickingSource));

        let outcome = dispatch(&mut ctx, "/random_term").await;

        assert_eq!(outcome.messages, vec![UiMessage::info(RANDOM_EMPTY)]);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_quit_signals_exit_and_blocks_further_input() {
        let (mut ctx, backend, sink) = context(knowledge(), Vec::new());

        let outcome = dispatch(&mut ctx, "Quit").await;
        assert!(outcome.is_exit());
        assert_eq!(outcome.messages, vec![UiMessage::info(GOODBYE)]);
        assert!(ctx.is_ended());

        let log = sink.contents();
        assert!(log.contains("AI Agent: Goodbye! Hope this was helpful."));
        assert!(log.contains("System: Chat ended: "));
        assert!(log.trim_end().ends_with(SESSION_RULE));

        let after = dispatch(&mut ctx, "/help").await;
        assert!(after.is_exit());
        assert_eq!(after.messages, vec![UiMessage::info(SESSION_ENDED)]);
        assert!(backend.calls().is_empty());
        assert_eq!(sink.contents(), log, "nothing is logged after quit");
    }

    #[tokio::test]
    async fn test_failed_query_keeps_loop_running() {
        let (mut ctx, _backend, _sink) = context(
            knowledge(),
            vec![
                Err(ChatError::Transport {
                    message: "dns failure".into(),
                    retryable: true,
                }),
                Ok(Reply::text("Recovered.")),
            ],
        );

        let failed = dispatch(&mut ctx, "what is delta").await;
        assert_eq!(failed.flow, Flow::Continue);
        assert_eq!(ctx.history(), ctx.template().turns());

        let next = dispatch(&mut ctx, "what is delta").await;
        assert_eq!(next.messages, vec![UiMessage::llm("Recovered.")]);
        assert_eq!(ctx.history().len(), ctx.template().turns().len() + 2);
    }

    #[tokio::test]
    async fn test_transcript_records_user_and_assistant() {
        let (mut ctx, _backend, _sink) = context(knowledge(), vec![Ok(Reply::text("Sure."))]);
        dispatch(&mut ctx, "hello").await;

        assert_eq!(
            ctx.transcript(),
            &[
                DisplayMessage::assistant("Hello! Which term shall we explore?"),
                DisplayMessage::user("hello"),
                DisplayMessage::assistant("Sure."),
            ]
        );
    }

    #[test]
    fn test_terms_listing_format() {
        assert_eq!(terms_listing(&[]), TERMS_EMPTY);
        assert_eq!(
            terms_listing(&["Ask".to_string(), "Bid".to_string()]),
            format!("{TERMS_HEADER}\n- Ask\n- Bid")
        );
    }
}
