mod health;
mod message;
mod post;
mod transfer;
mod user;

use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Feed and posts
        .route("/feed", get(post::get_feed))
        .route("/posts", post(post::create_post))
        .route("/posts/{id}/like", post(post::toggle_like))
        .route("/posts/{id}/save", post(post::toggle_save))
        .route(
            "/posts/{id}/comments",
            get(post::get_comments).post(post::add_comment),
        )
        // Users
        .route("/users", get(user::search_users))
        .route("/users/{id}", get(user::get_profile))
        .route("/users/{id}/follow", post(user::toggle_follow))
        // Direct messages
        .route("/messages", get(message::list_conversations))
        .route(
            "/messages/{peer}",
            get(message::get_conversation).post(message::send_message),
        )
        // Export / import
        .route("/state/export", get(transfer::export_state))
        .route("/state/import", post(transfer::import_state))
        .with_state(state)
}
