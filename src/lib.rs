//! vsp: turn a video script and a visual prompt template into numbered
//! Source Context / Prompt lists with a hosted chat model.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::SessionController;
pub use app::api::{
    Controller, GenerateOutcome, controller, generate, load_configuration, scan_markers,
};
pub use domain::{
    AppConfig, AppError, ChatMessage, ChatRole, Counters, GeminiApiConfig, GenerationConfig,
    MarkerKind, Transcript, Wizard, WizardStep,
};
pub use ports::{ChatService, ChatSession, SessionConfig};
