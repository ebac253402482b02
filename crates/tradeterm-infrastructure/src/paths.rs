//! Path resolution for tradeterm configuration files.
//!
//! ```text
//! ~/.config/tradeterm/        # user config directory (platform specific)
//! ├── config.toml             # application configuration
//! └── secret.json             # API keys
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "tradeterm";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find user config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Well-known locations of tradeterm files.
pub struct TradetermPaths;

impl TradetermPaths {
    /// Returns `<user config dir>/tradeterm`.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}
