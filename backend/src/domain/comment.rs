//! Comments left on photos.

use chrono::{DateTime, Utc};

use crate::domain::validation::{REQUIRED, required_text};
use crate::domain::{CommentId, FieldErrors, PhotoId, PrincipalId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub owner: PrincipalId,
    pub photo: PhotoId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated new comment. The photo cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub photo: PhotoId,
    pub content: String,
}

/// Validate a comment creation payload.
pub fn validate_new_comment(
    photo: Option<PhotoId>,
    content: Option<String>,
) -> Result<NewComment, FieldErrors> {
    let mut errors = FieldErrors::new();
    let content = required_text(&mut errors, "content", content, None);
    let Some(photo) = photo else {
        errors.push("photo", REQUIRED);
        return Err(errors);
    };
    errors.finish(NewComment { photo, content })
}

/// Validate replacement comment text.
pub fn validate_comment_content(content: Option<String>) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let content = required_text(&mut errors, "content", content, None);
    errors.finish(content)
}
