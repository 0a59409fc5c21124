use crate::{
    AppState,
    dto::{CommentRequest, CommentsResponse, CreatePostRequest, PaginationParams, ToggleResponse},
    errors::ApiError,
    feed::{FeedPage, feed_page},
    gateway::PostImage,
    models::{CreatedPostMeta, now_millis},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

/// GET /feed?page=1
pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<FeedPage>, ApiError> {
    let gateway = state.lock()?;
    Ok(Json(feed_page(
        &state.catalog,
        &gateway,
        params.page,
        now_millis(),
    )))
}

/// POST /posts
/// Body: { "caption": "...", "colorPair": ["#a", "#b"], "uploadedImage": false }
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatedPostMeta>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let image = if payload.uploaded_image {
        PostImage::Uploaded
    } else {
        PostImage::Generated(payload.color_pair.unwrap_or_default())
    };

    let meta = state
        .lock()?
        .create_post(payload.caption.as_deref(), image);

    Ok((StatusCode::CREATED, Json(meta)))
}

/// POST /posts/:id/like
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let value = state.lock()?.toggle_like(&id);
    Ok(Json(ToggleResponse { id, value }))
}

/// POST /posts/:id/save
pub async fn toggle_save(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let value = state.lock()?.toggle_save(&id);
    Ok(Json(ToggleResponse { id, value }))
}

/// GET /posts/:id/comments
pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.lock()?.comments_for(&id).to_vec();
    Ok(Json(CommentsResponse {
        post_id: id,
        comments,
    }))
}

/// POST /posts/:id/comments
/// Body: { "text": "..." }
/// Blank text is accepted and ignored (204).
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let added = state.lock()?.add_comment(&id, &payload.text);

    Ok(match added {
        Some(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
