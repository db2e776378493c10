//! PostgreSQL-backed photo repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PhotoEntry, PhotoRepository, StoreError};
use crate::domain::{Photo, PhotoDraft, PhotoId, PrincipalId};

use super::error_mapping::{map_diesel_error, map_pool_error, map_reference_error};
use super::models::{NewPhotoRow, PhotoRow, PhotoUpdate, image_to_json};
use super::pool::DbPool;
use super::read_helpers::{count_for, owner_of, owner_summaries, relationship_for};
use super::schema::{comments, likes, photos};

/// Diesel implementation of [`PhotoRepository`].
#[derive(Debug, Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn entries(
    conn: &mut AsyncPgConnection,
    rows: Vec<PhotoRow>,
    viewer: Option<PrincipalId>,
) -> Result<Vec<PhotoEntry>, StoreError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let owners: Vec<Uuid> = rows.iter().map(|row| row.owner_id).collect();
    let owners = owner_summaries(conn, &owners).await?;

    let like_counts: HashMap<i64, i64> = likes::table
        .filter(likes::photo_id.eq_any(&ids))
        .group_by(likes::photo_id)
        .select((likes::photo_id, count_star()))
        .load::<(i64, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let comment_counts: HashMap<i64, i64> = comments::table
        .filter(comments::photo_id.eq_any(&ids))
        .group_by(comments::photo_id)
        .select((comments::photo_id, count_star()))
        .load::<(i64, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let viewer_likes: HashMap<i64, i64> = match viewer {
        Some(viewer) => likes::table
            .filter(likes::owner_id.eq(*viewer.as_uuid()))
            .filter(likes::photo_id.eq_any(&ids))
            .select((likes::photo_id, likes::id))
            .load::<(i64, i64)>(conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect(),
        None => HashMap::new(),
    };

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let owner = owner_of(&owners, row.owner_id)?;
            Ok(PhotoEntry {
                photo: Photo::try_from(row)?,
                owner,
                likes_count: count_for(&like_counts, &id),
                comments_count: count_for(&comment_counts, &id),
                viewer_like_id: relationship_for(&viewer_likes, &id),
            })
        })
        .collect()
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<PhotoEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .select(PhotoRow::as_select())
            .order((photos::created_at.desc(), photos::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        entries(&mut conn, rows, viewer).await
    }

    async fn find(
        &self,
        id: PhotoId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<PhotoEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .find(id.get())
            .select(PhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(entries(&mut conn, rows, viewer).await?.pop())
    }

    async fn create(
        &self,
        owner: PrincipalId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Photo, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPhotoRow {
            owner_id: *owner.as_uuid(),
            title: &draft.title,
            description: &draft.description,
            camera_used: &draft.camera_used,
            lense_used: &draft.lense_used,
            image: image_to_json(draft.image.as_ref())?,
            created_at: now,
            updated_at: now,
        };
        let stored: PhotoRow = diesel::insert_into(photos::table)
            .values(&row)
            .returning(PhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_reference_error("owner", owner))?;
        Photo::try_from(stored)
    }

    async fn update(
        &self,
        id: PhotoId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Photo>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = PhotoUpdate {
            title: &draft.title,
            description: &draft.description,
            camera_used: &draft.camera_used,
            lense_used: &draft.lense_used,
            image: image_to_json(draft.image.as_ref())?,
            updated_at: now,
        };
        let row: Option<PhotoRow> = diesel::update(photos::table.find(id.get()))
            .set(&update)
            .returning(PhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Photo::try_from).transpose()
    }

    async fn delete(&self, id: PhotoId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(photos::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
