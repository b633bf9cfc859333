//! Gemini chat client implementation using reqwest.
//!
//! The `generateContent` endpoint is stateless, so each session keeps its own
//! turn history and replays it with every request.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, GeminiApiConfig};
use crate::ports::{ChatService, ChatSession, SessionConfig};

const X_GOOG_API_KEY: &str = "x-goog-api-key";

/// HTTP chat service for the Gemini Generative Language API.
#[derive(Clone)]
pub struct HttpGeminiService {
    api_url: Url,
    timeout_secs: u64,
    client: Client,
}

impl std::fmt::Debug for HttpGeminiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeminiService")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HttpGeminiService {
    pub fn new(config: &GeminiApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_url: config.api_url.clone(), timeout_secs: config.timeout_secs, client })
    }

    fn endpoint(&self, model: &str) -> Result<Url, AppError> {
        self.api_url.join(&format!("models/{}:generateContent", model)).map_err(|e| {
            AppError::Configuration(format!("Invalid endpoint for model '{}': {}", model, e))
        })
    }
}

impl ChatService for HttpGeminiService {
    fn create_session(
        &self,
        api_key: &str,
        config: SessionConfig,
    ) -> Result<Box<dyn ChatSession>, AppError> {
        let endpoint = self.endpoint(&config.model)?;
        log::debug!("Opening Gemini session: model={} endpoint={}", config.model, endpoint);

        Ok(Box::new(HttpGeminiSession {
            client: self.client.clone(),
            endpoint,
            api_key: api_key.to_string(),
            system_instruction: Content::text(None, config.system_instruction),
            generation_config: GenerationConfig { temperature: config.temperature },
            history: Vec::new(),
        }))
    }
}

/// One Gemini conversation with its accumulated turns.
pub struct HttpGeminiSession {
    client: Client,
    endpoint: Url,
    api_key: String,
    system_instruction: Content,
    generation_config: GenerationConfig,
    history: Vec<Content>,
}

impl std::fmt::Debug for HttpGeminiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeminiSession")
            .field("endpoint", &self.endpoint)
            .field("turns", &self.history.len())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: String) -> Self {
        Self { role: role.map(str::to_string), parts: vec![Part { text: Some(text) }] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: &'a Content,
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl ApiResponse {
    /// Concatenated text parts of the first candidate; empty when there is none.
    fn into_text(self) -> Result<String, AppError> {
        if self.candidates.is_empty() {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(AppError::session_error(format!("Prompt blocked: {}", reason), None));
            }
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();
        Ok(text)
    }
}

impl ChatSession for HttpGeminiSession {
    fn send_message(&mut self, message: &str) -> Result<String, AppError> {
        let mut contents = self.history.clone();
        contents.push(Content::text(Some("user"), message.to_string()));

        let request = ApiRequest {
            system_instruction: &self.system_instruction,
            contents: &contents,
            generation_config: self.generation_config,
        };

        log::debug!(
            "Sending Gemini turn {} ({} chars)",
            contents.len().div_ceil(2),
            message.chars().count()
        );
        let text = self.send_request(&request)?;

        // The API rejects empty text parts, so a turn without reply text is not replayed.
        if text.is_empty() {
            log::warn!("Gemini reply carried no text; turn left out of history");
            return Ok(text);
        }
        contents.push(Content::text(Some("model"), text.clone()));
        self.history = contents;
        Ok(text)
    }
}

impl HttpGeminiSession {
    fn send_request(&self, request: &ApiRequest<'_>) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(X_GOOG_API_KEY, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| AppError::session_error(format!("HTTP request failed: {}", e), None))?;

        let status = response.status();

        if status.is_success() {
            let api_response: ApiResponse = response.json().map_err(|e| {
                AppError::session_error(format!("Failed to parse response: {}", e), None)
            })?;
            api_response.into_text()
        } else {
            let body = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .map(|parsed| parsed.error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or(body);
            log::warn!("Gemini request failed with status {}", status.as_u16());
            Err(AppError::session_error(message, Some(status.as_u16())))
        }
    }
}
