pub mod config;
mod error;
pub mod markers;
pub mod prompt;
pub mod wizard;

pub use config::{AppConfig, GeminiApiConfig};
pub use error::AppError;
pub use markers::{Counters, MarkerKind};
pub use wizard::{ChatMessage, ChatRole, GenerationConfig, Transcript, Wizard, WizardStep};
