//! Error types for the tradeterm application.

use thiserror::Error;

/// A shared error type for the tradeterm workspace.
///
/// Only [`TradetermError::Credential`] is fatal; every other variant is
/// recovered at the boundary where it occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradetermError {
    /// No API credential could be resolved from any source
    #[error("Credential error: {0}")]
    Credential(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

impl TradetermError {
    /// Creates a Credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Check if this is a credential error
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Credential(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

impl From<std::io::Error> for TradetermError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TradetermError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TradetermError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TradetermError>`.
pub type Result<T> = std::result::Result<T, TradetermError>;
