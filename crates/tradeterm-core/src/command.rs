//! Builtin commands recognized by the dispatcher.
//!
//! The table is static and shared with the presentation layer, which uses
//! it for completion and hints.

/// A builtin command offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinCommand {
    /// Literal token typed by the user
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

impl BuiltinCommand {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

static BUILTIN_COMMANDS: [BuiltinCommand; 6] = [
    BuiltinCommand::new("/help", "Show the help text"),
    BuiltinCommand::new("/my_terms", "List the terms of the local knowledge base"),
    BuiltinCommand::new("/random_term", "Explain a randomly chosen local term"),
    BuiltinCommand::new("/reset", "Start a fresh conversation from the persona"),
    BuiltinCommand::new("quit", "End the session"),
    BuiltinCommand::new("exit", "End the session"),
];

/// Returns all builtin commands.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    &BUILTIN_COMMANDS
}

/// Dispatch target of one line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `quit` or `exit`, whichever was typed
    Quit(&'static str),
    Reset,
    Help,
    MyTerms,
    RandomTerm,
    /// Anything else: forwarded to the query resolver
    Query,
}

impl Command {
    /// Classifies raw input. Tokens match case-insensitively, ignoring
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "quit" => Self::Quit("quit"),
            "exit" => Self::Quit("exit"),
            "/reset" => Self::Reset,
            "/help" => Self::Help,
            "/my_terms" => Self::MyTerms,
            "/random_term" => Self::RandomTerm,
            _ => Self::Query,
        }
    }

    /// Token used in log markers, `None` for ordinary queries.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            Self::Quit(word) => Some(*word),
            Self::Reset => Some("/reset"),
            Self::Help => Some("/help"),
            Self::MyTerms => Some("/my_terms"),
            Self::RandomTerm => Some("/random_term"),
            Self::Query => None,
        }
    }
}
