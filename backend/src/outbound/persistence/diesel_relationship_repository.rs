//! PostgreSQL-backed likes, followers and attendances.
//!
//! The three tables share a shape: `(id, owner_id, <target>, created_at)`
//! with a unique index on `(owner_id, <target>)`. [`StoredRelationship`]
//! converts rows generically; [`impl_relationship_repository!`] generates the
//! per-table queries.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RelationshipEntry, RelationshipRepository, StoreError};
use crate::domain::{
    Attendances, Follows, Likes, PhotoId, PrincipalId, Relationship, RelationshipId,
    RelationshipKind, TourId,
};

use super::error_mapping::{map_diesel_error, map_pool_error, map_reference_error};
use super::models::{
    AttendanceRow, FollowerRow, LikeRow, NewAttendanceRow, NewFollowerRow, NewLikeRow,
    stored_username,
};
use super::pool::DbPool;
use super::schema::{attendances, followers, likes, principals};

/// Diesel implementation of [`RelationshipRepository`] for every kind.
#[derive(Debug, Clone)]
pub struct DieselRelationshipRepository {
    pool: DbPool,
}

impl DieselRelationshipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// A relationship table row.
trait StoredRelationship {
    type Kind: RelationshipKind;
    type Column: Copy + Eq + Hash;

    fn owner_column(&self) -> Uuid;

    fn target_column(&self) -> Self::Column;

    fn column_of(target: <Self::Kind as RelationshipKind>::Target) -> Self::Column;

    fn into_relationship(self) -> Relationship<Self::Kind>;
}

impl StoredRelationship for LikeRow {
    type Kind = Likes;
    type Column = i64;

    fn owner_column(&self) -> Uuid {
        self.owner_id
    }

    fn target_column(&self) -> i64 {
        self.photo_id
    }

    fn column_of(target: PhotoId) -> i64 {
        target.get()
    }

    fn into_relationship(self) -> Relationship<Likes> {
        Relationship {
            id: RelationshipId::new(self.id),
            owner: PrincipalId::from_uuid(self.owner_id),
            target: PhotoId::new(self.photo_id),
            created_at: self.created_at,
        }
    }
}

impl StoredRelationship for FollowerRow {
    type Kind = Follows;
    type Column = Uuid;

    fn owner_column(&self) -> Uuid {
        self.owner_id
    }

    fn target_column(&self) -> Uuid {
        self.followed_id
    }

    fn column_of(target: PrincipalId) -> Uuid {
        *target.as_uuid()
    }

    fn into_relationship(self) -> Relationship<Follows> {
        Relationship {
            id: RelationshipId::new(self.id),
            owner: PrincipalId::from_uuid(self.owner_id),
            target: PrincipalId::from_uuid(self.followed_id),
            created_at: self.created_at,
        }
    }
}

impl StoredRelationship for AttendanceRow {
    type Kind = Attendances;
    type Column = i64;

    fn owner_column(&self) -> Uuid {
        self.owner_id
    }

    fn target_column(&self) -> i64 {
        self.tour_id
    }

    fn column_of(target: TourId) -> i64 {
        target.get()
    }

    fn into_relationship(self) -> Relationship<Attendances> {
        Relationship {
            id: RelationshipId::new(self.id),
            owner: PrincipalId::from_uuid(self.owner_id),
            target: TourId::new(self.tour_id),
            created_at: self.created_at,
        }
    }
}

async fn usernames(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, StoreError> {
    let rows: Vec<(Uuid, String)> = principals::table
        .filter(principals::id.eq_any(ids))
        .select((principals::id, principals::username))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(rows.into_iter().collect())
}

async fn no_target_names(
    _conn: &mut AsyncPgConnection,
    _targets: &[i64],
) -> Result<HashMap<i64, String>, StoreError> {
    Ok(HashMap::new())
}

async fn entries<R: StoredRelationship>(
    conn: &mut AsyncPgConnection,
    rows: Vec<R>,
    target_names: HashMap<R::Column, String>,
) -> Result<Vec<RelationshipEntry<R::Kind>>, StoreError> {
    let owners: Vec<Uuid> = rows.iter().map(StoredRelationship::owner_column).collect();
    let owner_names = usernames(conn, &owners).await?;

    rows.into_iter()
        .map(|row| {
            let target_name = target_names.get(&row.target_column()).cloned();
            let relationship = row.into_relationship();
            let owner_name = owner_names
                .get(relationship.owner.as_uuid())
                .cloned()
                .ok_or_else(|| {
                    StoreError::query(format!(
                        "{} {} has no owner",
                        R::Kind::RESOURCE,
                        relationship.id
                    ))
                })?;
            Ok(RelationshipEntry {
                owner_username: stored_username(owner_name)?,
                relationship,
                target_name,
            })
        })
        .collect()
}

macro_rules! impl_relationship_repository {
    (
        $kind:ty {
            table: $table:ident,
            target: $target:ident,
            row: $row:ident,
            new_row: $new_row:ident,
            target_names: $target_names:path $(,)?
        }
    ) => {
        #[async_trait]
        impl RelationshipRepository<$kind> for DieselRelationshipRepository {
            async fn list(&self) -> Result<Vec<RelationshipEntry<$kind>>, StoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .select($row::as_select())
                    .order(($table::created_at.desc(), $table::id.desc()))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                let targets: Vec<_> = rows.iter().map(|row| row.$target).collect();
                let names = $target_names(&mut conn, &targets).await?;
                entries(&mut conn, rows, names).await
            }

            async fn find(
                &self,
                id: RelationshipId,
            ) -> Result<Option<RelationshipEntry<$kind>>, StoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .find(id.get())
                    .select($row::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                let targets: Vec<_> = rows.iter().map(|row| row.$target).collect();
                let names = $target_names(&mut conn, &targets).await?;
                Ok(entries(&mut conn, rows, names).await?.pop())
            }

            async fn create(
                &self,
                owner: PrincipalId,
                target: <$kind as RelationshipKind>::Target,
                now: DateTime<Utc>,
            ) -> Result<Relationship<$kind>, StoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = $new_row {
                    owner_id: *owner.as_uuid(),
                    $target: <$row as StoredRelationship>::column_of(target),
                    created_at: now,
                };
                // The unique index settles concurrent duplicates.
                let stored: $row = diesel::insert_into($table::table)
                    .values(&row)
                    .returning($row::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(map_reference_error(
                        <$kind as RelationshipKind>::TARGET_FIELD,
                        target,
                    ))?;
                Ok(stored.into_relationship())
            }

            async fn delete(&self, id: RelationshipId) -> Result<bool, StoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table.find(id.get()))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(deleted > 0)
            }
        }
    };
}

impl_relationship_repository!(Likes {
    table: likes,
    target: photo_id,
    row: LikeRow,
    new_row: NewLikeRow,
    target_names: no_target_names,
});

impl_relationship_repository!(Follows {
    table: followers,
    target: followed_id,
    row: FollowerRow,
    new_row: NewFollowerRow,
    target_names: usernames,
});

impl_relationship_repository!(Attendances {
    table: attendances,
    target: tour_id,
    row: AttendanceRow,
    new_row: NewAttendanceRow,
    target_names: no_target_names,
});
