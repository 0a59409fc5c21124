use crate::{
    AppState,
    dto::{ConversationResponse, MessageRequest},
    errors::ApiError,
    feed::{ConversationSummary, conversations},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

/// GET /messages
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let gateway = state.lock()?;
    Ok(Json(conversations(&state.catalog, &gateway)))
}

/// GET /messages/:peer
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(peer): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let messages = state.lock()?.conversation(&peer).to_vec();
    Ok(Json(ConversationResponse {
        peer_id: peer,
        messages,
    }))
}

/// POST /messages/:peer
/// Body: { "text": "..." }
/// Blank text is accepted and ignored (204).
pub async fn send_message(
    State(state): State<AppState>,
    Path(peer): Path<String>,
    Json(payload): Json<MessageRequest>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let sent = state.lock()?.send_message(&peer, &payload.text);

    Ok(match sent {
        Some(message) => (StatusCode::CREATED, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
