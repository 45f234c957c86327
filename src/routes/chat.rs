use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse},
    services::chatbot::respond,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;

    let outcome = respond(&state.sessions, state.model.as_ref(), &request).await?;

    Ok(Json(ChatResponse::new(outcome.reply, outcome.session_id)))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy".to_string() })
}
