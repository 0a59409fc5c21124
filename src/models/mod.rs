mod comment;
mod message;
mod post;

pub use comment::{Comment, CommentStore, MAX_COMMENTS_PER_POST};
pub use message::{Message, MessageStore};
pub use post::{ColorPair, CreatedPostMeta, LOCAL_AUTHOR_ID};

use std::collections::BTreeMap;

/// The local user, as recorded on comments and outgoing messages.
pub const YOU: &str = "you";

/// post id -> liked
pub type LikeMap = BTreeMap<String, bool>;
/// post id -> saved
pub type SaveMap = BTreeMap<String, bool>;
/// user id -> followed
pub type FollowMap = BTreeMap<String, bool>;

/// Millisecond Unix timestamp, the unit every persisted record uses.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fresh record id: a short kind prefix followed by a v4 UUID.
pub fn fresh_id(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}
