mod bootstrap;
mod helper;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;
use tradeterm_core::command::builtin_commands;
use tradeterm_core::{SpeakerType, UiMessage, dispatch};

use crate::helper::CliHelper;

/// Trading term explainer backed by a local glossary and Gemini.
#[derive(Parser, Debug)]
#[command(name = "tradeterm", version, about)]
pub struct Args {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Model identifier, e.g. gemini-2.0-flash
    #[arg(long)]
    pub model: Option<String>,
    /// Persona template (JSON)
    #[arg(long)]
    pub persona: Option<PathBuf>,
    /// Help text file
    #[arg(long)]
    pub help_file: Option<PathBuf>,
    /// Term records (JSON)
    #[arg(long)]
    pub terms: Option<PathBuf>,
    /// Directory for the session log
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradeterm=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(message: &UiMessage) {
    for line in message.text.lines() {
        let styled = match message.speaker_type {
            SpeakerType::Local => line.yellow(),
            SpeakerType::Llm => line.bright_blue(),
            SpeakerType::SystemInfo => line.bright_black(),
            SpeakerType::SystemError => line.red(),
        };
        println!("{styled}");
    }
    println!();
}

/// The main entry point for the tradeterm REPL.
///
/// Bootstraps the session, then forwards every line to the dispatcher and
/// renders the returned messages until the dispatcher asks to stop.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = bootstrap::resolve_config(&args);
    let bootstrap::Bootstrap {
        context: mut ctx,
        warnings,
    } = match bootstrap::bootstrap(&config) {
        Ok(bootstrap) => bootstrap,
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            return Err(e);
        }
    };

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== AI Trading Term Explainer ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Model: {}. Type '/help' for commands or 'quit' to exit.", ctx.model_name())
            .bright_black()
    );
    println!(
        "{}",
        format!("Session log: {}", ctx.log_location()).bright_black()
    );
    for command in builtin_commands() {
        println!(
            "  {} {}",
            format!("{:<14}", command.name).bright_cyan(),
            command.description.bright_black()
        );
    }
    for warning in &warnings {
        println!("{}", format!("Warning: {warning}").yellow());
    }
    println!();

    for message in ctx.transcript() {
        println!("{}", message.content.bright_blue());
        println!();
    }

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => "quit".to_string(),
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        let outcome = dispatch(&mut ctx, trimmed).await;
        for message in &outcome.messages {
            render(message);
        }
        if outcome.is_exit() {
            break;
        }
    }

    Ok(())
}
