//! Port for tours.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OwnerSummary, PrincipalId, RelationshipId, Tour, TourDraft, TourId};

use super::StoreError;

/// Tour joined with its owner and attendance figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourEntry {
    pub tour: Tour,
    pub owner: OwnerSummary,
    pub attendance_count: u64,
    /// Attendance record held by the viewer on this tour.
    pub viewer_attendance_id: Option<RelationshipId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<TourEntry>, StoreError>;

    async fn find(
        &self,
        id: TourId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<TourEntry>, StoreError>;

    async fn create(
        &self,
        owner: PrincipalId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Tour, StoreError>;

    async fn update(
        &self,
        id: TourId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Tour>, StoreError>;

    /// Delete the tour and its attendances.
    async fn delete(&self, id: TourId) -> Result<bool, StoreError>;
}
