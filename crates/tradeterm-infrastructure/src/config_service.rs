//! Configuration service.
//!
//! Loads [`AppConfig`] from `config.toml`. A missing file is normal and
//! yields defaults; a malformed one yields defaults plus a warning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tradeterm_core::config::AppConfig;
use tradeterm_core::error::Result;

use crate::paths::TradetermPaths;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses `path`, or the default `config.toml` location when `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| TradetermPaths::config_file().ok());
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Strict load: `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<AppConfig>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(toml::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lenient load used at startup.
    pub fn get_config(&self) -> AppConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No config file found, using defaults");
                AppConfig::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring unusable config file: {}", e);
                AppConfig::default()
            }
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}
