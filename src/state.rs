// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::llm_client::{LanguageModel, OpenAiClient};
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub model: Arc<dyn LanguageModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { sessions: SessionManager::new(), model }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(OpenAiClient::new(&config.llm)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_from_config_without_key() {
        let config = Config::from_lookup(|_| None).unwrap();
        let state = AppState::from_config(&config).unwrap();
        assert!(state.sessions.is_empty().await);
        let err = state.model.complete("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY environment variable is not set");
    }
}
