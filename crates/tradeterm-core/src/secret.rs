//! Secret management service trait.
//!
//! Defines the interface for loading secret configuration (API keys).

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for loading secret configuration from managed storage.
///
/// Implementations must never log or echo secret values, including in
/// error messages.
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// A missing store is not an error: it yields `SecretConfig::default()`.
    fn load_secrets(&self) -> Result<SecretConfig>;
}
