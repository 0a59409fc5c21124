use crate::models::ColorPair;
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(max = 2200, message = "Caption must be at most 2200 characters"))]
    pub caption: Option<String>,
    #[validate(custom(function = "validate_color_pair"))]
    pub color_pair: Option<ColorPair>,
    /// The picture was uploaded rather than generated; no colours are kept
    #[serde(default)]
    pub uploaded_image: bool,
}

#[derive(Debug, Validate, Deserialize)]
pub struct CommentRequest {
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub text: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct MessageRequest {
    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub text: String,
}

/// Feed query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

fn validate_color_pair(pair: &ColorPair) -> Result<(), ValidationError> {
    let valid = |c: &str| !c.trim().is_empty() && c.len() <= 64;
    if valid(&pair.0) && valid(&pair.1) {
        Ok(())
    } else {
        Err(ValidationError::new("color_pair")
            .with_message("Colors must be 1-64 characters".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_post_request_validation() {
        let ok: CreatePostRequest =
            serde_json::from_str(r##"{"caption":"hi","colorPair":["#aaa","#bbb"]}"##).unwrap();
        assert!(ok.validate().is_ok());
        assert!(!ok.uploaded_image);

        let bad_color: CreatePostRequest =
            serde_json::from_str(r##"{"colorPair":["", "#bbb"]}"##).unwrap();
        assert!(bad_color.validate().is_err());

        let long = CreatePostRequest {
            caption: Some("x".repeat(2201)),
            color_pair: None,
            uploaded_image: true,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn blank_text_passes_validation() {
        // Blank text is a no-op downstream, not a validation failure
        let req = CommentRequest { text: "   ".into() };
        assert!(req.validate().is_ok());
    }
}
