//! AI chat proxy handler

use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    ai::{AiError, ChatRequest},
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    response::Envelope,
    state::AppState,
};

/// Message typed into the chat widget
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Forward a chat message to the AI service
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<ChatMessage>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let request = ChatRequest {
        message: payload.message,
        user_id: Some(user.id.to_string()),
        auth_token: user.token,
    };

    let answer = state.ai_service.chat(&request).await.map_err(|e| match e {
        AiError::NotConfigured => ApiError::InternalServerError(e.to_string()),
        AiError::Transport(_) => {
            ApiError::BadGateway("Failed to communicate with AI service".to_string())
        }
    })?;

    Ok(Envelope::ok(answer, "AI response retrieved successfully"))
}
