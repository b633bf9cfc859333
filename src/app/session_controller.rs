//! Session lifecycle and request composition for numbered prompt generation.

use crate::domain::markers::Counters;
use crate::domain::{AppError, GeminiApiConfig, prompt};
use crate::ports::{ChatService, ChatSession, SessionConfig};

/// Open session together with the counters observed on it.
struct ActiveSession {
    session: Box<dyn ChatSession>,
    counters: Counters,
}

/// Owns the chat session and running marker counters for one wizard run.
///
/// Counters are only updated after a complete reply, so a failed turn leaves
/// both the session and the counters as they were.
pub struct SessionController<S: ChatService> {
    service: S,
    credential: Option<String>,
    model: String,
    temperature: f32,
    active: Option<ActiveSession>,
}

impl<S: ChatService> SessionController<S> {
    pub fn new(service: S, credential: Option<String>, config: &GeminiApiConfig) -> Self {
        Self {
            service,
            credential,
            model: config.model.clone(),
            temperature: config.temperature,
            active: None,
        }
    }

    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    /// Counters of the active session, if one exists.
    pub fn counters(&self) -> Option<Counters> {
        self.active.as_ref().map(|active| active.counters)
    }

    /// Drop the active session and its counters.
    pub fn reset(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Session discarded");
        }
    }

    /// Open a new session and send the initial request.
    ///
    /// The previous session, if any, is replaced only when the first turn succeeds.
    pub fn start(&mut self, theme: &str, script: &str, template: &str) -> Result<String, AppError> {
        let api_key = self.api_key()?;
        let request = prompt::initial_request(theme, script, template)?;

        let config = SessionConfig {
            model: self.model.clone(),
            system_instruction: prompt::system_instruction(),
            temperature: self.temperature,
        };
        let mut session = self.service.create_session(api_key, config)?;
        log::info!("Started session (model={}, theme={:?})", self.model, theme);

        let text = session.send_message(&request)?;
        let counters = Counters::from_text(&text);
        log::debug!(
            "Counters after initial turn: source={} prompt={}",
            counters.last_source_index,
            counters.last_prompt_index
        );

        self.active = Some(ActiveSession { session, counters });
        Ok(text)
    }

    /// Send a new script chunk on the active session.
    pub fn continue_generation(&mut self, script_chunk: &str) -> Result<String, AppError> {
        let active = self.active.as_mut().ok_or(AppError::NoActiveSession)?;
        let request = prompt::continuation_request(script_chunk, &active.counters)?;

        let text = active.session.send_message(&request)?;
        active.counters.scan(&text);
        log::debug!(
            "Counters after continuation: source={} prompt={}",
            active.counters.last_source_index,
            active.counters.last_prompt_index
        );
        Ok(text)
    }

    /// Continuation request that would be sent for `script_chunk` right now.
    pub fn compose_continuation(&self, script_chunk: &str) -> Result<String, AppError> {
        let active = self.active.as_ref().ok_or(AppError::NoActiveSession)?;
        prompt::continuation_request(script_chunk, &active.counters)
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config_error("API key is missing. Set GEMINI_API_KEY."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChatService;

    fn controller(service: &FakeChatService) -> SessionController<FakeChatService> {
        SessionController::new(
            service.clone(),
            Some("test-key".to_string()),
            &GeminiApiConfig::default(),
        )
    }

    #[test]
    fn start_without_credential_fails_before_creating_session() {
        let service = FakeChatService::new().reply("Source Context 1: a");
        for credential in [None, Some(String::new()), Some("   ".to_string())] {
            let mut controller =
                SessionController::new(service.clone(), credential, &GeminiApiConfig::default());
            let err = controller.start("theme", "script", "template").unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
            assert!(!controller.has_session());
        }
        assert_eq!(service.create_count(), 0);
        assert!(service.sent().is_empty());
    }

    #[test]
    fn start_sends_initial_request_with_session_config() {
        let service = FakeChatService::new().reply("Source Context 1: a\nPrompt 1: b");
        let mut controller = controller(&service);

        let text = controller.start("Dusk", "The sun fell.", "[Theme: YYYYYYYYYY]").unwrap();

        assert_eq!(text, "Source Context 1: a\nPrompt 1: b");
        let created = service.created_sessions.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        let (api_key, config) = &created[0];
        assert_eq!(api_key, "test-key");
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.system_instruction, prompt::system_instruction());

        let sent = service.last_sent().unwrap();
        assert!(sent.contains("replace YYYYYYYYYY with: \"Dusk\""));
        assert!(sent.contains("The sun fell."));
    }

    #[test]
    fn start_tracks_maximum_markers() {
        let service = FakeChatService::new()
            .reply("Source Context 3: x\nSource Context 7: y\nSource Context 2: z\nPrompt 4: p");
        let mut controller = controller(&service);

        controller.start("t", "s", "tpl").unwrap();

        assert_eq!(controller.counters(), Some(Counters::new(7, 4)));
    }

    #[test]
    fn continue_before_start_fails_without_network_call() {
        let service = FakeChatService::new().reply("unused");
        let mut controller = controller(&service);

        let err = controller.continue_generation("more").unwrap_err();

        assert!(matches!(err, AppError::NoActiveSession));
        assert!(service.sent().is_empty());
        assert_eq!(service.create_count(), 0);
    }

    #[test]
    fn continuation_hints_next_indices() {
        let service = FakeChatService::new()
            .reply("Source Context 5: a\nPrompt 5: b")
            .reply("Source Context 6: c\nPrompt 6: d");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        controller.continue_generation("chunk two").unwrap();

        let sent = service.last_sent().unwrap();
        assert!(sent.contains("likely around 5. The new one MUST start at 6."));
        assert_eq!(sent.matches("MUST start at 6").count(), 2);
        assert!(sent.contains("chunk two"));
        assert_eq!(controller.counters(), Some(Counters::new(6, 6)));
    }

    #[test]
    fn consecutive_turns_reuse_one_session() {
        let service = FakeChatService::new()
            .reply("Source Context 1: a")
            .reply("Source Context 2: b")
            .reply("Source Context 3: c");
        let mut controller = controller(&service);

        controller.start("t", "s", "tpl").unwrap();
        controller.continue_generation("two").unwrap();
        controller.continue_generation("three").unwrap();

        assert_eq!(service.create_count(), 1);
        let session_ids: Vec<usize> = service.sent().into_iter().map(|(id, _)| id).collect();
        assert_eq!(session_ids, vec![1, 1, 1]);
    }

    #[test]
    fn reply_without_markers_keeps_counters() {
        let service = FakeChatService::new()
            .reply("Source Context 4: a\nPrompt 2: b")
            .reply("Sorry, I cannot continue.");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        controller.continue_generation("more").unwrap();

        assert_eq!(controller.counters(), Some(Counters::new(4, 2)));
    }

    #[test]
    fn counters_never_decrease_across_turns() {
        let service = FakeChatService::new()
            .reply("Source Context 9: a\nPrompt 9: b")
            .reply("Source Context 1: restarted\nPrompt 1: restarted");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        controller.continue_generation("more").unwrap();

        assert_eq!(controller.counters(), Some(Counters::new(9, 9)));
    }

    #[test]
    fn failed_continuation_leaves_state_untouched() {
        let service = FakeChatService::new()
            .reply("Source Context 2: a\nPrompt 2: b")
            .fail("quota exceeded")
            .reply("Source Context 3: c");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        let err = controller.continue_generation("more").unwrap_err();
        assert!(matches!(err, AppError::Session { .. }));
        assert_eq!(controller.counters(), Some(Counters::new(2, 2)));

        controller.continue_generation("again").unwrap();
        assert!(service.last_sent().unwrap().contains("MUST start at 3"));
        assert_eq!(service.create_count(), 1);
    }

    #[test]
    fn failed_start_keeps_previous_session() {
        let service = FakeChatService::new()
            .reply("Source Context 3: a\nPrompt 3: b")
            .fail("network down");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        let err = controller.start("t2", "s2", "tpl2").unwrap_err();

        assert!(matches!(err, AppError::Session { .. }));
        assert_eq!(controller.counters(), Some(Counters::new(3, 3)));
        assert_eq!(service.create_count(), 2);
    }

    #[test]
    fn failed_session_creation_is_propagated() {
        let service = FakeChatService::new().fail_create("unreachable");
        let mut controller = controller(&service);

        let err = controller.start("t", "s", "tpl").unwrap_err();

        assert!(matches!(err, AppError::Session { .. }));
        assert!(!controller.has_session());
    }

    #[test]
    fn restart_resets_counters_with_new_session() {
        let service = FakeChatService::new()
            .reply("Source Context 8: a\nPrompt 8: b")
            .reply("Source Context 1: fresh");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        controller.start("t", "other", "tpl").unwrap();

        assert_eq!(controller.counters(), Some(Counters::new(1, 0)));
        assert_eq!(service.create_count(), 2);
    }

    #[test]
    fn reset_discards_session_and_counters() {
        let service = FakeChatService::new().reply("Source Context 2: a");
        let mut controller = controller(&service);
        controller.start("t", "s", "tpl").unwrap();

        controller.reset();

        assert!(!controller.has_session());
        assert_eq!(controller.counters(), None);
        assert!(matches!(controller.continue_generation("x"), Err(AppError::NoActiveSession)));
    }

    #[test]
    fn compose_continuation_reflects_current_counters() {
        let service = FakeChatService::new().reply("Source Context 5: a\nPrompt 5: b");
        let mut controller = controller(&service);
        assert!(matches!(controller.compose_continuation("x"), Err(AppError::NoActiveSession)));

        controller.start("t", "s", "tpl").unwrap();

        let request = controller.compose_continuation("x").unwrap();
        assert!(request.contains("MUST start at 6"));
        assert_eq!(service.sent().len(), 1);
    }
}
