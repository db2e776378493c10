//! Relationship ports over the in-memory tables.
//!
//! [`MemoryKind`] tells the generic implementation which table a kind lives
//! in and how to check that its target exists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStore, Table, Tables, newest_first};
use crate::domain::ports::{RelationshipEntry, RelationshipRepository, StoreError};
use crate::domain::{
    Attendances, Follows, Likes, PrincipalId, Relationship, RelationshipId, RelationshipKind,
};

pub(super) trait MemoryKind: RelationshipKind + Clone {
    const UNIQUE_CONSTRAINT: &'static str;

    fn table(tables: &Tables) -> &Table<Relationship<Self>>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Relationship<Self>>;

    fn target_exists(tables: &Tables, target: Self::Target) -> bool;

    fn target_name(_tables: &Tables, _target: Self::Target) -> Option<String> {
        None
    }
}

impl MemoryKind for Likes {
    const UNIQUE_CONSTRAINT: &'static str = "likes_owner_id_photo_id_key";

    fn table(tables: &Tables) -> &Table<Relationship<Self>> {
        &tables.likes
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Relationship<Self>> {
        &mut tables.likes
    }

    fn target_exists(tables: &Tables, target: Self::Target) -> bool {
        tables.photos.contains(target.get())
    }
}

impl MemoryKind for Follows {
    const UNIQUE_CONSTRAINT: &'static str = "followers_owner_id_followed_id_key";

    fn table(tables: &Tables) -> &Table<Relationship<Self>> {
        &tables.follows
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Relationship<Self>> {
        &mut tables.follows
    }

    fn target_exists(tables: &Tables, target: Self::Target) -> bool {
        tables.principals.contains_key(&target)
    }

    fn target_name(tables: &Tables, target: Self::Target) -> Option<String> {
        tables
            .principals
            .get(&target)
            .map(|row| row.principal.username.to_string())
    }
}

impl MemoryKind for Attendances {
    const UNIQUE_CONSTRAINT: &'static str = "attendances_owner_id_tour_id_key";

    fn table(tables: &Tables) -> &Table<Relationship<Self>> {
        &tables.attendances
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Relationship<Self>> {
        &mut tables.attendances
    }

    fn target_exists(tables: &Tables, target: Self::Target) -> bool {
        tables.tours.contains(target.get())
    }
}

fn entry<K: MemoryKind>(
    tables: &Tables,
    relationship: &Relationship<K>,
) -> Result<RelationshipEntry<K>, StoreError> {
    let owner_username = tables
        .principals
        .get(&relationship.owner)
        .map(|row| row.principal.username.clone())
        .ok_or_else(|| {
            StoreError::query(format!("{} {} has no owner", K::RESOURCE, relationship.id))
        })?;
    Ok(RelationshipEntry {
        relationship: relationship.clone(),
        owner_username,
        target_name: K::target_name(tables, relationship.target),
    })
}

#[async_trait]
impl<K: MemoryKind> RelationshipRepository<K> for InMemoryStore {
    async fn list(&self) -> Result<Vec<RelationshipEntry<K>>, StoreError> {
        let tables = self.lock()?;
        let mut entries = K::table(&tables)
            .values()
            .map(|relationship| entry(&tables, relationship))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut entries, |e| {
            (e.relationship.created_at, e.relationship.id.get())
        });
        Ok(entries)
    }

    async fn find(&self, id: RelationshipId) -> Result<Option<RelationshipEntry<K>>, StoreError> {
        let tables = self.lock()?;
        K::table(&tables)
            .get(id.get())
            .map(|relationship| entry(&tables, relationship))
            .transpose()
    }

    async fn create(
        &self,
        owner: PrincipalId,
        target: K::Target,
        now: DateTime<Utc>,
    ) -> Result<Relationship<K>, StoreError> {
        let mut tables = self.lock()?;
        if !K::target_exists(&tables, target) {
            return Err(StoreError::missing_reference(
                K::TARGET_FIELD,
                target.to_string(),
            ));
        }
        let table = K::table_mut(&mut tables);
        if table
            .values()
            .any(|r| r.owner == owner && r.target == target)
        {
            return Err(StoreError::duplicate(K::UNIQUE_CONSTRAINT));
        }
        Ok(table.insert_with(|id| Relationship {
            id: RelationshipId::new(id),
            owner,
            target,
            created_at: now,
        }))
    }

    async fn delete(&self, id: RelationshipId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        Ok(K::table_mut(&mut tables).remove(id.get()).is_some())
    }
}
