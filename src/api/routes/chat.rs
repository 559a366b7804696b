//! Chat Route
//!
//! - POST /api/v1/chat - Keyword triage over a session transcript

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ChatRequest, ChatResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// Longest accepted message, in characters
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// POST /api/v1/chat
///
/// Unknown session ids start a fresh session.
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::Validation(format!(
            "message must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let dataset = state.dataset().await;
    let (session, reply) = state.sessions.send(req.session_id, message, &dataset).await;

    tracing::debug!(
        session_id = %session.id,
        category = reply.category.unwrap_or("-"),
        "Chat message triaged"
    );

    Ok(Json(ChatResponse {
        session_id: session.id,
        reply,
        messages: session.messages,
    }))
}
