//! Port for profile reads and writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PrincipalId, Profile, ProfileChanges, ProfileId, RelationshipId, Username};

use super::StoreError;

/// Profile joined with its owner and counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub profile: Profile,
    pub owner_username: Username,
    pub photos_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// Follow record from the viewer to this profile's owner.
    pub viewer_follow_id: Option<RelationshipId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// All profiles, newest first.
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<ProfileEntry>, StoreError>;

    async fn find(
        &self,
        id: ProfileId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<ProfileEntry>, StoreError>;

    /// Replace mutable fields. `None` when the profile vanished.
    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Profile>, StoreError>;

    /// Delete the profile together with its principal and everything they own.
    ///
    /// Returns `false` when the profile did not exist.
    async fn delete_with_owner(&self, id: ProfileId) -> Result<bool, StoreError>;
}
