// src/message.rs
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/run` and `/api/v1/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub input_value: Option<String>,
    pub user_id: Option<String>,
    // Sent by flow clients; not used.
    pub input_type: Option<String>,
    pub output_type: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// Ids are opaque keys: whitespace-only means absent, otherwise used verbatim.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl ChatRequest {
    /// First non-empty of `input_value`, then `message`, passed through unchanged.
    pub fn effective_message(&self) -> Option<&str> {
        [&self.input_value, &self.message].into_iter().find_map(non_empty)
    }

    pub fn session_id(&self) -> Option<&str> {
        non_blank(&self.session_id)
    }

    pub fn user_id(&self) -> Option<&str> {
        non_blank(&self.user_id)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageText {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ComponentResults {
    pub message: MessageText,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ComponentOutput {
    pub outputs: ComponentResults,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RunOutput {
    pub outputs: Vec<ComponentOutput>,
}

/// Flow-run envelope:
/// `{"outputs":[{"outputs":[{"outputs":{"message":{"message":..}}}]}],"session_id":..}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub outputs: Vec<RunOutput>,
    pub session_id: String,
}

impl ChatResponse {
    pub fn new(reply: impl Into<String>, session_id: impl Into<String>) -> Self {
        let component = ComponentOutput {
            outputs: ComponentResults { message: MessageText { message: reply.into() } },
        };
        Self {
            outputs: vec![RunOutput { outputs: vec![component] }],
            session_id: session_id.into(),
        }
    }

    /// The completion text carried by the envelope.
    pub fn reply(&self) -> Option<&str> {
        self.outputs
            .first()
            .and_then(|run| run.outputs.first())
            .map(|c| c.outputs.message.message.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
