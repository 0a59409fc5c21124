use serde::{Deserialize, Serialize};

/// Author id stamped on every post created locally.
pub const LOCAL_AUTHOR_ID: &str = "me";

/// Two CSS colours for a generated gradient, serialized as `["#a", "#b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair(pub String, pub String);

impl ColorPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self(from.into(), to.into())
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::new("#a1c4fd", "#c2e9fb")
    }
}

/// Metadata of a post authored locally. Image pixels are never stored, only
/// enough to regenerate a placeholder visual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostMeta {
    pub id: String,
    #[serde(default)]
    pub caption: String,
    /// `None` when the post used an uploaded image
    pub color_pair: Option<ColorPair>,
    pub created_at: i64,
    pub author_id: String,
}
