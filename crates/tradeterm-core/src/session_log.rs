//! Append-only, best-effort session log.
//!
//! Writes never fail from the caller's point of view: sink errors are
//! reported through `tracing` and otherwise dropped.

use std::io;
use std::sync::{Arc, Mutex};
use strum::Display;

/// Rule written between turns.
pub const TURN_SEPARATOR: &str = "------------------------------";
/// Rule written after a command.
pub const COMMAND_SEPARATOR: &str = "---";
/// Rule framing the session header and the end-of-session marker.
pub const SESSION_RULE: &str = "========================================";

/// Speaker tag prefixed to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogSpeaker {
    #[strum(serialize = "User")]
    User,
    #[strum(serialize = "AI Agent")]
    Agent,
    #[strum(serialize = "AI Agent (Local)")]
    AgentLocal,
    #[strum(serialize = "AI Agent (LLM)")]
    AgentLlm,
    #[strum(serialize = "System")]
    System,
    #[strum(serialize = "System Error")]
    SystemError,
}

/// Destination of formatted log lines.
pub trait LogSink: Send {
    /// Appends `text` verbatim, including its trailing newline.
    fn append(&mut self, text: &str) -> io::Result<()>;

    /// Human-readable location, used in diagnostics.
    fn describe(&self) -> String;
}

/// Wraps a [`LogSink`] with line formatting and error suppression.
pub struct SessionLog {
    sink: Box<dyn LogSink>,
}

impl SessionLog {
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// In-memory log plus a handle to read it back.
    pub fn in_memory() -> (Self, MemoryLogSink) {
        let sink = MemoryLogSink::default();
        (Self::new(Box::new(sink.clone())), sink)
    }

    /// Writes `line` as `"{speaker}: {line}\n"`, or `"{line}\n"` without a speaker.
    pub fn write(&mut self, line: &str, speaker: Option<LogSpeaker>) {
        let formatted = match speaker {
            Some(speaker) => format!("{speaker}: {line}\n"),
            None => format!("{line}\n"),
        };
        if let Err(e) = self.sink.append(&formatted) {
            tracing::warn!(
                "Error writing to session log '{}': {}",
                self.sink.describe(),
                e
            );
        }
    }

    pub fn line(&mut self, line: &str) {
        self.write(line, None);
    }

    pub fn says(&mut self, speaker: LogSpeaker, line: &str) {
        self.write(line, Some(speaker));
    }

    pub fn location(&self) -> String {
        self.sink.describe()
    }
}

/// Shared in-memory sink. Clones observe the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    buffer: Arc<Mutex<String>>,
}

impl MemoryLogSink {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("memory log poisoned"))?;
        buffer.push_str(text);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
