use std::io;

use thiserror::Error;

/// Library-wide error type for vsp operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue (missing credential, client setup).
    #[error("{0}")]
    Configuration(String),

    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A continuation was requested before any session was started.
    #[error("No active session. Start a generation before continuing.")]
    NoActiveSession,

    /// The remote chat service failed.
    #[error("{}", format_session_error(.message, .status))]
    Session { message: String, status: Option<u16> },

    /// Request template rendering failed.
    #[error("Failed to render {template}: {reason}")]
    PromptRender { template: String, reason: String },

    /// Wizard input was blank.
    #[error("{0} must not be empty")]
    EmptyInput(String),

    /// Interactive input failure.
    #[error("{0}")]
    Validation(String),
}

fn format_session_error(message: &str, status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("Chat session error ({}): {}", code, message),
        None => format!("Chat session error: {}", message),
    }
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn session_error<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::Session { message: message.into(), status }
    }
}
