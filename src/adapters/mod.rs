pub mod gemini_client_http;
pub mod mock_chat_service;

pub use gemini_client_http::HttpGeminiService;
pub use mock_chat_service::MockChatService;
