//! Startup: configuration, credentials, resources, session log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tradeterm_core::config::AppConfig;
use tradeterm_core::{SessionContext, SessionLog};
use tradeterm_infrastructure::{
    ConfigService, FileSecretService, SessionLogHeader, SessionResources, create_session_log,
    resolve_api_key,
};
use tradeterm_interaction::GeminiChatBackend;

use crate::Args;

/// A ready-to-use session plus what the user should see before the first prompt.
pub struct Bootstrap {
    pub context: SessionContext,
    pub warnings: Vec<String>,
}

/// Merges `config.toml` with command-line overrides.
pub fn resolve_config(args: &Args) -> AppConfig {
    let mut config = ConfigService::new(args.config.clone()).get_config();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(path) = &args.persona {
        config.persona_file = path.clone();
    }
    if let Some(path) = &args.help_file {
        config.help_file = path.clone();
    }
    if let Some(path) = &args.terms {
        config.terms_file = path.clone();
    }
    if let Some(dir) = &args.log_dir {
        config.log_dir = dir.clone();
    }
    config
}

/// Builds the session. Fails only when no API key can be found.
pub fn bootstrap(config: &AppConfig) -> Result<Bootstrap> {
    let api_key = resolve_api_key(
        &FileSecretService::default_location(),
        &config.api_key_env,
        |name| std::env::var(name).ok(),
    )?;

    let resources = SessionResources::load(config);
    let mut warnings = resources.warnings;

    let mut backend = GeminiChatBackend::new(api_key.expose(), config.model.clone())
        .with_base_url(config.api_base_url.clone());
    if let Some(secs) = config.request_timeout_secs {
        backend = backend.with_timeout(Duration::from_secs(secs));
    }

    let header = SessionLogHeader {
        started_at: Local::now(),
        model: config.model.clone(),
        persona_file: config.persona_file.display().to_string(),
        help_file: config.help_file.display().to_string(),
        terms_file: config.terms_file.display().to_string(),
        term_count: resources.knowledge.len(),
        greeting: resources.template.greeting().map(str::to_string),
    };
    let log = match create_session_log(&config.log_dir, &header) {
        Ok((log, path)) => {
            tracing::debug!("Session log created at {}", path.display());
            log
        }
        Err(e) => {
            tracing::warn!("Session log unavailable, keeping it in memory: {}", e);
            warnings.push(format!("Session log could not be created: {e}"));
            SessionLog::in_memory().0
        }
    };

    let context = SessionContext::new(
        resources.knowledge,
        Arc::new(resources.template),
        Arc::new(backend),
        resources.help_text,
        log,
    );
    tracing::info!("Agent initialized with {}", context.model_name());

    Ok(Bootstrap { context, warnings })
}
