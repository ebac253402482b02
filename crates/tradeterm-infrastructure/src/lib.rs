//! File-system collaborators: configuration, secrets, resource loading and
//! the session log file.

pub mod config_service;
pub mod dto;
pub mod loader;
pub mod paths;
pub mod secret_service;
pub mod session_log_file;

pub use crate::config_service::ConfigService;
pub use crate::loader::SessionResources;
pub use crate::secret_service::{ApiKey, ApiKeySource, FileSecretService, resolve_api_key};
pub use crate::session_log_file::{FileLogSink, SessionLogHeader, create_session_log};
