//! Lenient loaders for the persona, help and terms files.
//!
//! Nothing here returns an error: missing or unreadable text yields an
//! empty string, missing or malformed structured data yields an empty list,
//! and the reason is reported through `tracing`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tradeterm_core::config::AppConfig;
use tradeterm_core::knowledge::{KnowledgeBase, TermRecord};
use tradeterm_core::persona::PersonaTemplate;

use crate::dto::PersonaFileDto;

pub const DEFAULT_HELP_TEXT: &str = "Default Help: Ask questions. Type /quit to exit.";

/// Reads a UTF-8 text file, or returns `""`.
pub fn load_text(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("Loaded text from '{}'", path.display());
            text
        }
        Err(e) => {
            tracing::warn!("Failed to read '{}': {}", path.display(), e);
            String::new()
        }
    }
}

/// Reads and deserializes a JSON file, or returns `None`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to read '{}': {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to decode JSON from '{}': {}", path.display(), e);
            None
        }
    }
}

/// Reads a JSON array, or returns an empty list.
pub fn load_structured(path: &Path) -> Vec<Value> {
    match load_json::<Value>(path) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            tracing::warn!("Expected a JSON array in '{}'", path.display());
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Term records from `path`. Elements that are not objects with string
/// `term` and `definition` fields are dropped.
pub fn load_term_records(path: &Path) -> Vec<TermRecord> {
    load_structured(path)
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<TermRecord>(item).ok())
        .collect()
}

/// Persona template from `path`, `None` when missing, malformed or empty.
pub fn load_persona_template(path: &Path) -> Option<PersonaTemplate> {
    load_json::<PersonaFileDto>(path)
        .map(PersonaFileDto::into_domain)
        .filter(|template| !template.is_empty())
}

/// Everything a session needs from disk, with fallbacks applied.
#[derive(Debug, Clone)]
pub struct SessionResources {
    pub template: PersonaTemplate,
    pub help_text: String,
    pub knowledge: KnowledgeBase,
    /// Non-fatal configuration problems to surface to the user.
    pub warnings: Vec<String>,
}

impl SessionResources {
    /// Loads the files named by `config`, substituting hardcoded fallbacks.
    pub fn load(config: &AppConfig) -> Self {
        let mut warnings = Vec::new();

        let template = load_persona_template(&config.persona_file).unwrap_or_else(|| {
            warnings.push(format!(
                "Persona file '{}' not loaded. Using minimal default.",
                config.persona_file.display()
            ));
            PersonaTemplate::fallback()
        });

        let mut help_text = load_text(&config.help_file);
        if help_text.trim().is_empty() {
            warnings.push(format!(
                "Help file '{}' not loaded. Using minimal default.",
                config.help_file.display()
            ));
            help_text = DEFAULT_HELP_TEXT.to_string();
        }

        let knowledge = KnowledgeBase::build(load_term_records(&config.terms_file));
        if knowledge.is_empty() {
            warnings.push(format!(
                "No terms loaded from '{}'. The local knowledge base is empty.",
                config.terms_file.display()
            ));
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        tracing::info!("Loaded {} local terms", knowledge.len());

        Self {
            template,
            help_text,
            knowledge,
            warnings,
        }
    }
}
