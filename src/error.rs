// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::services::llm_client::LlmError;
use crate::services::session_manager::SessionNotFound;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingCredential,

    #[error("{0}")]
    ModelCall(LlmError),

    #[error(transparent)]
    SessionNotFound(#[from] SessionNotFound),
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingMessage | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AppError::MissingCredential,
            other => AppError::ModelCall(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}
