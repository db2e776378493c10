//! Port for the principal directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OwnerSummary, PasswordDigest, Principal, PrincipalId, ProfileId, Username};

use super::StoreError;

/// Data needed to insert a principal.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub username: Username,
    pub digest: PasswordDigest,
    pub is_admin: bool,
}

/// Principal created together with its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPrincipal {
    pub principal: Principal,
    pub profile_id: ProfileId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Insert the principal and its empty profile atomically.
    ///
    /// A taken username yields [`StoreError::Duplicate`].
    async fn create_with_profile(
        &self,
        principal: NewPrincipal,
        now: DateTime<Utc>,
    ) -> Result<CreatedPrincipal, StoreError>;

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError>;

    /// Load a principal and its stored digest by username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(Principal, PasswordDigest)>, StoreError>;

    /// Public identity joined from the principal and its profile.
    async fn owner_summary(&self, id: PrincipalId) -> Result<Option<OwnerSummary>, StoreError>;
}
