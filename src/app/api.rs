//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration,
//! chat services and the session controller.

use std::path::Path;

use crate::adapters::{HttpGeminiService, MockChatService};
use crate::app::config::{load_config, resolve_api_key};
use crate::app::session_controller::SessionController;
use crate::ports::ChatService;

pub use crate::domain::{AppConfig, AppError, Counters, GenerationConfig, Transcript};
use crate::domain::ChatMessage;

/// Credential used in mock mode when no real key is configured.
const MOCK_API_KEY: &str = "mock-api-key";

/// Controller over whichever chat service the run uses.
pub type Controller = SessionController<Box<dyn ChatService>>;

/// Load configuration from an explicit path or the current directory.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, AppError> {
    load_config(path, &std::env::current_dir()?)
}

/// Build a session controller backed by Gemini, or by the offline mock service.
pub fn controller(config: &AppConfig, mock: bool) -> Result<Controller, AppError> {
    let credential = resolve_api_key();
    if mock {
        let credential = credential.or_else(|| Some(MOCK_API_KEY.to_string()));
        let service: Box<dyn ChatService> = Box::new(MockChatService);
        return Ok(SessionController::new(service, credential, &config.gemini));
    }

    let service: Box<dyn ChatService> = Box::new(HttpGeminiService::new(&config.gemini)?);
    Ok(SessionController::new(service, credential, &config.gemini))
}

/// Result of a non-interactive generation run.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub transcript: Transcript,
    pub counters: Counters,
}

/// Run the initial turn, then one continuation per chunk, on a single session.
///
/// Stops at the first failure.
pub fn generate<S: ChatService>(
    controller: &mut SessionController<S>,
    inputs: &GenerationConfig,
    chunks: &[String],
) -> Result<GenerateOutcome, AppError> {
    let mut transcript = Transcript::default();

    let text = controller.start(&inputs.theme, &inputs.script, &inputs.template)?;
    transcript.push(ChatMessage::model(text));

    for chunk in chunks {
        transcript.push(ChatMessage::user(chunk.as_str()));
        let text = controller.continue_generation(chunk)?;
        transcript.push(ChatMessage::model(text));
    }

    let counters = controller.counters().unwrap_or_default();
    Ok(GenerateOutcome { transcript, counters })
}

/// Highest markers present in an existing transcript.
pub fn scan_markers(text: &str) -> Counters {
    Counters::from_text(text)
}
