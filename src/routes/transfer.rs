use crate::{
    AppState,
    dto::ImportResponse,
    errors::ApiError,
    snapshot::EXPORT_FILE_NAME,
};
use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::warn;

/// GET /state/export
/// Response: the snapshot as a JSON attachment
pub async fn export_state(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.lock()?.export().to_json();

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

/// POST /state/import
/// Body: a previously exported snapshot, merged into the current state
pub async fn import_state(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    let report = state.lock()?.import_text(&body).map_err(|e| {
        warn!("Rejected import: {}", e);
        ApiError::InvalidImport(e.to_string())
    })?;

    Ok(Json(ImportResponse {
        message: "Imported. Merged with existing state.",
        changed: report.changed,
    }))
}
