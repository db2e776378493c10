//! Port for photo comments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentId, NewComment, OwnerSummary, PhotoId, PrincipalId};

use super::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub comment: Comment,
    pub owner: OwnerSummary,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments newest first, optionally restricted to one photo.
    async fn list(&self, photo: Option<PhotoId>) -> Result<Vec<CommentEntry>, StoreError>;

    async fn find(&self, id: CommentId) -> Result<Option<CommentEntry>, StoreError>;

    /// A missing photo yields [`StoreError::MissingReference`].
    async fn create(
        &self,
        owner: PrincipalId,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError>;

    async fn update_content(
        &self,
        id: CommentId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError>;

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError>;
}
