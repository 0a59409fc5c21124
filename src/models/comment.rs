use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A post keeps at most this many of its most recent comments.
pub const MAX_COMMENTS_PER_POST: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "user", alias = "author")]
    pub author: String,
    pub text: String,
    #[serde(rename = "at", alias = "timestamp")]
    pub timestamp: i64,
}

/// post id -> comments, oldest first
pub type CommentStore = BTreeMap<String, Vec<Comment>>;
