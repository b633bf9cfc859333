use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::AppError;
use crate::ports::{ChatService, ChatSession, SessionConfig};

/// Scripted chat service recording every session and message.
#[derive(Clone, Default)]
pub struct FakeChatService {
    pub created_sessions: Arc<Mutex<Vec<(String, SessionConfig)>>>,
    pub sent_messages: Arc<Mutex<Vec<(usize, String)>>>,
    replies: Arc<Mutex<VecDeque<Result<String, AppError>>>>,
    fail_create: Arc<Mutex<Option<String>>>,
}

impl FakeChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for the next turn.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a failing turn.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(AppError::session_error(message, Some(500))));
        self
    }

    /// Make every `create_session` call fail.
    pub fn fail_create(self, message: impl Into<String>) -> Self {
        *self.fail_create.lock().unwrap() = Some(message.into());
        self
    }

    pub fn create_count(&self) -> usize {
        self.created_sessions.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<(usize, String)> {
        self.sent_messages.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Option<String> {
        self.sent_messages.lock().unwrap().last().map(|(_, message)| message.clone())
    }
}

impl ChatService for FakeChatService {
    fn create_session(
        &self,
        api_key: &str,
        config: SessionConfig,
    ) -> Result<Box<dyn ChatSession>, AppError> {
        if let Some(message) = self.fail_create.lock().unwrap().clone() {
            return Err(AppError::session_error(message, None));
        }
        let mut created = self.created_sessions.lock().unwrap();
        created.push((api_key.to_string(), config));
        Ok(Box::new(FakeChatSession { id: created.len(), service: self.clone() }))
    }
}

struct FakeChatSession {
    id: usize,
    service: FakeChatService,
}

impl ChatSession for FakeChatSession {
    fn send_message(&mut self, message: &str) -> Result<String, AppError> {
        self.service.sent_messages.lock().unwrap().push((self.id, message.to_string()));
        self.service
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::session_error("test: no scripted reply", None)))
    }
}
