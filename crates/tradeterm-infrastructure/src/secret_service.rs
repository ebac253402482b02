//! Secret service implementation and API key resolution.
//!
//! The key is taken from the managed secret store first (`secret.json`)
//! and from the process environment second.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tradeterm_core::config::SecretConfig;
use tradeterm_core::error::{Result, TradetermError};
use tradeterm_core::secret::SecretService;

use crate::paths::TradetermPaths;

/// Reads `secret.json` from disk on each call.
#[derive(Debug, Clone)]
pub struct FileSecretService {
    path: Option<PathBuf>,
}

impl FileSecretService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Uses the default `secret.json` location.
    pub fn default_location() -> Self {
        Self {
            path: TradetermPaths::secret_file().ok(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SecretService for FileSecretService {
    fn load_secrets(&self) -> Result<SecretConfig> {
        let Some(path) = &self.path else {
            return Ok(SecretConfig::default());
        };
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SecretConfig::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Where the API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    SecretStore,
    Environment,
}

/// A resolved API key. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: ApiKeySource,
}

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> ApiKeySource {
        self.source
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves the API key in priority order.
///
/// `env` reads an environment variable; production callers pass
/// `|name| std::env::var(name).ok()`.
pub fn resolve_api_key(
    secrets: &dyn SecretService,
    env_var: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ApiKey> {
    match secrets.load_secrets() {
        Ok(config) => {
            if let Some(value) = config
                .gemini
                .map(|gemini| gemini.api_key)
                .filter(|key| !key.trim().is_empty())
            {
                tracing::info!("API key loaded from secret store");
                return Ok(ApiKey {
                    value,
                    source: ApiKeySource::SecretStore,
                });
            }
        }
        Err(e) => {
            tracing::warn!("Secret store unavailable, trying environment: {}", e);
        }
    }

    if let Some(value) = env(env_var).filter(|key| !key.trim().is_empty()) {
        tracing::info!("API key loaded from environment variable {}", env_var);
        return Ok(ApiKey {
            value,
            source: ApiKeySource::Environment,
        });
    }

    Err(TradetermError::credential(format!(
        "API key not found in the secret store or the {env_var} environment variable"
    )))
}
