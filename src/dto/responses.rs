use crate::{
    catalog::Profile,
    models::{Comment, Message},
};
use serde::Serialize;

/// New value of a flag after a toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub value: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsResponse {
    pub post_id: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub peer_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    pub changed: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub seed: u32,
}

impl From<&Profile> for UserSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            seed: profile.seed,
        }
    }
}
