//! rustyline helper: completion and inline hints for builtin commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tradeterm_core::command::{BuiltinCommand, Command, builtin_commands};

/// Inline hint: the rest of a command name followed by its description.
///
/// Accepting the hint inserts only the name suffix.
pub struct CommandHint {
    display: String,
    completion: String,
}

impl Hint for CommandHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        Some(&self.completion)
    }
}

pub struct CliHelper {
    commands: &'static [BuiltinCommand],
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: builtin_commands(),
        }
    }

    /// Commands whose name extends `prefix`, compared case-insensitively.
    fn matching(&self, prefix: &str) -> impl Iterator<Item = &'static BuiltinCommand> {
        let lowered = prefix.to_lowercase();
        self.commands
            .iter()
            .filter(move |cmd| !lowered.is_empty() && cmd.name.starts_with(lowered.as_str()))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .matching(&line[..pos])
            .map(|cmd| Pair {
                display: format!("{:<14} {}", cmd.name, cmd.description),
                replacement: cmd.name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CliHelper {
    type Hint = CommandHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CommandHint> {
        // Only hint at the end of a single-word line.
        if pos < line.len() || line.contains(' ') {
            return None;
        }
        let typed = line.to_lowercase().len();
        self.matching(line)
            .find(|cmd| cmd.name.len() > typed)
            .map(|cmd| {
                let completion = cmd.name[typed..].to_string();
                CommandHint {
                    display: format!("{completion}  {}", cmd.description),
                    completion,
                }
            })
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if Command::parse(line).token().is_some() {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for CliHelper {}
