//! PostgreSQL-backed profile repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ProfileEntry, ProfileRepository, StoreError};
use crate::domain::{PrincipalId, Profile, ProfileChanges, ProfileId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ProfileRow, ProfileUpdate, image_to_json, stored_username};
use super::pool::DbPool;
use super::read_helpers::{count_for, relationship_for};
use super::schema::{followers, photos, principals, profiles};

/// Diesel implementation of [`ProfileRepository`].
#[derive(Debug, Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type ProfileWithOwner = (ProfileRow, String);

/// Attach owner names, counts and the viewer's follow to `rows`.
async fn entries(
    conn: &mut AsyncPgConnection,
    rows: Vec<ProfileWithOwner>,
    viewer: Option<PrincipalId>,
) -> Result<Vec<ProfileEntry>, StoreError> {
    let owners: Vec<Uuid> = rows.iter().map(|(row, _)| row.owner_id).collect();

    let photo_counts: HashMap<Uuid, i64> = photos::table
        .filter(photos::owner_id.eq_any(&owners))
        .group_by(photos::owner_id)
        .select((photos::owner_id, count_star()))
        .load::<(Uuid, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let follower_counts: HashMap<Uuid, i64> = followers::table
        .filter(followers::followed_id.eq_any(&owners))
        .group_by(followers::followed_id)
        .select((followers::followed_id, count_star()))
        .load::<(Uuid, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let following_counts: HashMap<Uuid, i64> = followers::table
        .filter(followers::owner_id.eq_any(&owners))
        .group_by(followers::owner_id)
        .select((followers::owner_id, count_star()))
        .load::<(Uuid, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let viewer_follows: HashMap<Uuid, i64> = match viewer {
        Some(viewer) => followers::table
            .filter(followers::owner_id.eq(*viewer.as_uuid()))
            .filter(followers::followed_id.eq_any(&owners))
            .select((followers::followed_id, followers::id))
            .load::<(Uuid, i64)>(conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect(),
        None => HashMap::new(),
    };

    rows.into_iter()
        .map(|(row, username)| {
            let owner = row.owner_id;
            Ok(ProfileEntry {
                profile: Profile::try_from(row)?,
                owner_username: stored_username(username)?,
                photos_count: count_for(&photo_counts, &owner),
                followers_count: count_for(&follower_counts, &owner),
                following_count: count_for(&following_counts, &owner),
                viewer_follow_id: relationship_for(&viewer_follows, &owner),
            })
        })
        .collect()
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<ProfileEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileWithOwner> = profiles::table
            .inner_join(principals::table)
            .select((ProfileRow::as_select(), principals::username))
            .order((profiles::created_at.desc(), profiles::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        entries(&mut conn, rows, viewer).await
    }

    async fn find(
        &self,
        id: ProfileId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<ProfileEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileWithOwner> = profiles::table
            .inner_join(principals::table)
            .filter(profiles::id.eq(id.get()))
            .select((ProfileRow::as_select(), principals::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(entries(&mut conn, rows, viewer).await?.pop())
    }

    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = ProfileUpdate {
            name: &changes.name,
            description: &changes.description,
            image: image_to_json(changes.image.as_ref())?,
            updated_at: now,
        };
        let row: Option<ProfileRow> = diesel::update(profiles::table.find(id.get()))
            .set(&update)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Profile::try_from).transpose()
    }

    async fn delete_with_owner(&self, id: ProfileId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner: Option<Uuid> = profiles::table
            .find(id.get())
            .select(profiles::owner_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(owner) = owner else {
            return Ok(false);
        };
        // Foreign keys cascade from the principal to everything it owns.
        let deleted = diesel::delete(principals::table.find(owner))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
