//! File-backed session log.
//!
//! One timestamped, append-only UTF-8 file per process run.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tradeterm_core::error::Result;
use tradeterm_core::session_log::{LogSink, LogSpeaker, SESSION_RULE, SessionLog};

/// Appends to a log file, reopening it for every write.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        file.write_all(text.as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Values written once at the top of a session log.
#[derive(Debug, Clone)]
pub struct SessionLogHeader {
    pub started_at: DateTime<Local>,
    pub model: String,
    pub persona_file: String,
    pub help_file: String,
    pub terms_file: String,
    pub term_count: usize,
    pub greeting: Option<String>,
}

impl SessionLogHeader {
    fn preamble(&self) -> String {
        format!(
            "Chat Log: {}\nModel: {}\nPersona: {}\nHelp: {}\nTerms: {}\nLoaded {} local terms.\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.model,
            self.persona_file,
            self.help_file,
            self.terms_file,
            self.term_count,
        )
    }
}

/// `ai_chat_log_%Y%m%d_%H%M%S.txt`
pub fn log_file_name(started_at: &DateTime<Local>) -> String {
    format!("ai_chat_log_{}.txt", started_at.format("%Y%m%d_%H%M%S"))
}

/// Creates the session log file in `dir` and writes its header.
pub fn create_session_log(dir: &Path, header: &SessionLogHeader) -> Result<(SessionLog, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(&header.started_at));

    let mut file = File::create(&path)?;
    file.write_all(header.preamble().as_bytes())?;
    drop(file);

    let mut log = SessionLog::new(Box::new(FileLogSink::new(&path)));
    log.line(SESSION_RULE);
    if let Some(greeting) = &header.greeting {
        log.says(LogSpeaker::Agent, greeting);
        log.line(SESSION_RULE);
    }

    tracing::info!("Session log: {}", path.display());
    Ok((log, path))
}
