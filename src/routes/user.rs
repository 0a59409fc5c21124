use crate::{
    AppState,
    dto::{SearchParams, ToggleResponse, UserSummary},
    errors::ApiError,
    feed::{ProfileView, profile_view},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};

const SEARCH_LIMIT: usize = 6;

/// GET /users?q=user1
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<UserSummary>> {
    Json(
        state
            .catalog
            .search(&params.q, SEARCH_LIMIT)
            .into_iter()
            .map(UserSummary::from)
            .collect(),
    )
}

/// GET /users/:id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.catalog.profile(&id).ok_or(ApiError::NotFound)?;
    let gateway = state.lock()?;

    Ok(Json(profile_view(profile, &gateway)))
}

/// POST /users/:id/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let value = state.lock()?.toggle_follow(&id);
    Ok(Json(ToggleResponse { id, value }))
}
