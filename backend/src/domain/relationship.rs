//! Relationship records: likes, follows and attendances.
//!
//! Each kind is a membership fact between an owning principal and a target.
//! The `(owner, target)` pair is unique per kind; the store enforces it.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{PhotoId, PrincipalId, RelationshipId, TourId};

/// Static description of one relationship kind.
pub trait RelationshipKind: Send + Sync + 'static {
    /// Identifier type of the record being related to.
    type Target: Copy
        + Eq
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Singular resource name used in messages.
    const RESOURCE: &'static str;
    /// Request/response field naming the target.
    const TARGET_FIELD: &'static str;
    /// Response field carrying the target's display name, if the kind has one.
    const TARGET_NAME_FIELD: Option<&'static str> = None;
}

/// A principal liking a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Likes {}

impl RelationshipKind for Likes {
    type Target = PhotoId;
    const RESOURCE: &'static str = "like";
    const TARGET_FIELD: &'static str = "photo";
}

/// A principal following another principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follows {}

impl RelationshipKind for Follows {
    type Target = PrincipalId;
    const RESOURCE: &'static str = "follower";
    const TARGET_FIELD: &'static str = "followed";
    const TARGET_NAME_FIELD: Option<&'static str> = Some("followed_name");
}

/// A principal attending a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendances {}

impl RelationshipKind for Attendances {
    type Target = TourId;
    const RESOURCE: &'static str = "attendance";
    const TARGET_FIELD: &'static str = "tour";
}

/// A stored relationship record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship<K: RelationshipKind> {
    pub id: RelationshipId,
    pub owner: PrincipalId,
    pub target: K::Target,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn kinds_name_their_target_fields() {
        assert_eq!(Likes::TARGET_FIELD, "photo");
        assert_eq!(Follows::TARGET_FIELD, "followed");
        assert_eq!(Attendances::TARGET_FIELD, "tour");
        assert_eq!(Follows::TARGET_NAME_FIELD, Some("followed_name"));
        assert_eq!(Likes::TARGET_NAME_FIELD, None);
    }
}
