use crate::{AppState, errors::ApiError};
use axum::{Json, extract::State};
use chrono::Utc;

/// GET /health
/// Response: storage backend and how much state is held
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let gateway = state.lock()?;

    Ok(Json(serde_json::json!({
      "status": "healthy",
      "storage": state.storage_backend,
      "createdPosts": gateway.created_posts().len(),
      "conversations": gateway.messages().len(),
      "timestamp": Utc::now().timestamp()
    })))
}
