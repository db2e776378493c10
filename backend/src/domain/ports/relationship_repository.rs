//! Port for relationship records, generic over the relationship kind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PrincipalId, Relationship, RelationshipId, RelationshipKind, Username};

use super::StoreError;

/// Relationship joined with display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEntry<K: RelationshipKind> {
    pub relationship: Relationship<K>,
    pub owner_username: Username,
    /// Display name of the target, for kinds that expose one.
    pub target_name: Option<String>,
}

#[async_trait]
pub trait RelationshipRepository<K: RelationshipKind>: Send + Sync {
    /// All records of this kind, newest first.
    async fn list(&self) -> Result<Vec<RelationshipEntry<K>>, StoreError>;

    async fn find(&self, id: RelationshipId) -> Result<Option<RelationshipEntry<K>>, StoreError>;

    /// Insert `(owner, target)`.
    ///
    /// An existing pair yields [`StoreError::Duplicate`]; an unknown target
    /// yields [`StoreError::MissingReference`] on the kind's target field.
    async fn create(
        &self,
        owner: PrincipalId,
        target: K::Target,
        now: DateTime<Utc>,
    ) -> Result<Relationship<K>, StoreError>;

    async fn delete(&self, id: RelationshipId) -> Result<bool, StoreError>;
}
