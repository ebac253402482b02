//! Application configuration model.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Root configuration loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Model identifier sent to the chat API
    pub model: String,
    /// Persona template (JSON)
    pub persona_file: PathBuf,
    /// Help text shown by `/help` (plain text)
    pub help_file: PathBuf,
    /// Term records (JSON array of `{term, definition}`)
    pub terms_file: PathBuf,
    /// Directory receiving the per-run session log
    pub log_dir: PathBuf,
    /// Base URL of the `generateContent` endpoint family
    pub api_base_url: String,
    /// Optional transport timeout. No timeout when unset.
    pub request_timeout_secs: Option<u64>,
    /// Environment variable consulted when the secret store has no key
    pub api_key_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            persona_file: PathBuf::from("persona_config.json"),
            help_file: PathBuf::from("persona_help.txt"),
            terms_file: PathBuf::from("my_trading_terms.json"),
            log_dir: PathBuf::from("."),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API credentials.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
}
