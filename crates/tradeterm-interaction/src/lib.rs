//! Remote chat backends.

pub mod gemini_api_backend;

pub use gemini_api_backend::GeminiChatBackend;
