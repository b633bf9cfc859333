//! Chat service port definition.

use crate::domain::AppError;

/// Parameters fixed for the lifetime of a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Model identifier (e.g., "gemini-3-flash-preview").
    pub model: String,
    /// System instruction applied to every turn.
    pub system_instruction: String,
    /// Sampling temperature.
    pub temperature: f32,
}

/// An open multi-turn exchange. Prior turns are kept as context for the next one.
///
/// Turns are strictly sequential: `send_message` takes `&mut self`.
pub trait ChatSession {
    /// Send one user message and return the model's reply text.
    ///
    /// A failed turn must not be added to the session's context.
    fn send_message(&mut self, message: &str) -> Result<String, AppError>;
}

/// Port for opening chat sessions against a generative-language service.
pub trait ChatService {
    /// Create a new session authenticated with `api_key`.
    fn create_session(
        &self,
        api_key: &str,
        config: SessionConfig,
    ) -> Result<Box<dyn ChatSession>, AppError>;
}

impl<T: ChatService + ?Sized> ChatService for Box<T> {
    fn create_session(
        &self,
        api_key: &str,
        config: SessionConfig,
    ) -> Result<Box<dyn ChatSession>, AppError> {
        (**self).create_session(api_key, config)
    }
}
