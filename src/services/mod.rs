pub mod chatbot;
pub mod llm_client;
pub mod session_manager;
