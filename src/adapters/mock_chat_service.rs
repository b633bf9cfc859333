//! Offline chat service producing deterministic numbered output.

use crate::domain::AppError;
use crate::domain::prompt::{
    NEW_SCRIPT_END, NEW_SCRIPT_START, SCRIPT_END, SCRIPT_START, section_between,
};
use crate::ports::{ChatService, ChatSession, SessionConfig};

/// Chat service that never touches the network.
///
/// Every non-blank script line becomes one `Source Context` / `Prompt` pair,
/// numbered continuously across the session.
#[derive(Debug, Clone, Default)]
pub struct MockChatService;

impl ChatService for MockChatService {
    fn create_session(
        &self,
        _api_key: &str,
        config: SessionConfig,
    ) -> Result<Box<dyn ChatSession>, AppError> {
        log::info!("Mock mode: opening offline session for model {}", config.model);
        Ok(Box::new(MockChatSession::default()))
    }
}

#[derive(Debug, Default)]
pub struct MockChatSession {
    emitted: u32,
}

impl ChatSession for MockChatSession {
    fn send_message(&mut self, message: &str) -> Result<String, AppError> {
        let script = section_between(message, SCRIPT_START, SCRIPT_END)
            .or_else(|| section_between(message, NEW_SCRIPT_START, NEW_SCRIPT_END))
            .unwrap_or_default();

        let lines: Vec<&str> =
            script.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        if lines.is_empty() {
            return Ok("No script content to visualize.".to_string());
        }

        let first = self.emitted + 1;
        let numbered: Vec<(u32, &str)> = (first..).zip(lines).collect();
        self.emitted += numbered.len() as u32;

        let mut out = String::from("Source Context:\n");
        for (index, line) in &numbered {
            out.push_str(&format!("Source Context {}: {}\n", index, line));
        }
        out.push_str("\nPrompt:\n");
        for (index, line) in &numbered {
            out.push_str(&format!("Prompt {}: Cinematic still illustrating \"{}\"\n", index, line));
        }
        Ok(out)
    }
}
