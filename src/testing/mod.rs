mod fake_chat_service;

pub use fake_chat_service::FakeChatService;
