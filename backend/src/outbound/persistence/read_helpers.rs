//! Batched lookups shared by the listing repositories.
//!
//! Lists load their rows first, then fetch owners and counts for the whole
//! page in one query each, keyed by id.

use std::collections::HashMap;
use std::hash::Hash;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{OwnerSummary, PrincipalId, ProfileId, RelationshipId};

use super::error_mapping::map_diesel_error;
use super::models::{image_from_json, stored_username};
use super::schema::{principals, profiles};

/// Owner summaries for every principal in `owners`.
pub(crate) async fn owner_summaries(
    conn: &mut AsyncPgConnection,
    owners: &[Uuid],
) -> Result<HashMap<Uuid, OwnerSummary>, StoreError> {
    let rows: Vec<(Uuid, String, i64, Option<Value>)> = principals::table
        .inner_join(profiles::table)
        .filter(principals::id.eq_any(owners))
        .select((
            principals::id,
            principals::username,
            profiles::id,
            profiles::image,
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    rows.into_iter()
        .map(|(id, username, profile_id, image)| {
            let summary = OwnerSummary {
                principal_id: PrincipalId::from_uuid(id),
                username: stored_username(username)?,
                profile_id: ProfileId::new(profile_id),
                profile_image: image_from_json(image)?,
            };
            Ok((id, summary))
        })
        .collect()
}

pub(crate) fn owner_of(
    owners: &HashMap<Uuid, OwnerSummary>,
    owner: Uuid,
) -> Result<OwnerSummary, StoreError> {
    owners
        .get(&owner)
        .cloned()
        .ok_or_else(|| StoreError::query(format!("owner {owner} has no profile")))
}

pub(crate) fn count_for<K: Eq + Hash>(counts: &HashMap<K, i64>, key: &K) -> u64 {
    counts
        .get(key)
        .and_then(|count| u64::try_from(*count).ok())
        .unwrap_or(0)
}

pub(crate) fn relationship_for<K: Eq + Hash>(
    held: &HashMap<K, i64>,
    key: &K,
) -> Option<RelationshipId> {
    held.get(key).copied().map(RelationshipId::new)
}
