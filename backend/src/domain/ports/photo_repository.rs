//! Port for photo posts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OwnerSummary, Photo, PhotoDraft, PhotoId, PrincipalId, RelationshipId};

use super::StoreError;

/// Photo joined with its owner and read-time counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub photo: Photo,
    pub owner: OwnerSummary,
    pub likes_count: u64,
    pub comments_count: u64,
    /// Like record held by the viewer on this photo.
    pub viewer_like_id: Option<RelationshipId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<PhotoEntry>, StoreError>;

    async fn find(
        &self,
        id: PhotoId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<PhotoEntry>, StoreError>;

    async fn create(
        &self,
        owner: PrincipalId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Photo, StoreError>;

    async fn update(
        &self,
        id: PhotoId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Photo>, StoreError>;

    /// Delete the photo, its comments and its likes.
    async fn delete(&self, id: PhotoId) -> Result<bool, StoreError>;
}
