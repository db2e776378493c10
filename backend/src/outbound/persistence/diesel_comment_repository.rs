//! PostgreSQL-backed comment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CommentEntry, CommentRepository, StoreError};
use crate::domain::{Comment, CommentId, NewComment, PhotoId, PrincipalId};

use super::error_mapping::{map_diesel_error, map_pool_error, map_reference_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::read_helpers::{owner_of, owner_summaries};
use super::schema::comments;

/// Diesel implementation of [`CommentRepository`].
#[derive(Debug, Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn entries(
    conn: &mut AsyncPgConnection,
    rows: Vec<CommentRow>,
) -> Result<Vec<CommentEntry>, StoreError> {
    let owners: Vec<Uuid> = rows.iter().map(|row| row.owner_id).collect();
    let owners = owner_summaries(conn, &owners).await?;
    rows.into_iter()
        .map(|row| {
            let owner = owner_of(&owners, row.owner_id)?;
            Ok(CommentEntry {
                comment: Comment::from(row),
                owner,
            })
        })
        .collect()
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list(&self, photo: Option<PhotoId>) -> Result<Vec<CommentEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = comments::table
            .select(CommentRow::as_select())
            .order((comments::created_at.desc(), comments::id.desc()))
            .into_boxed::<diesel::pg::Pg>();
        if let Some(photo) = photo {
            query = query.filter(comments::photo_id.eq(photo.get()));
        }
        let rows: Vec<CommentRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        entries(&mut conn, rows).await
    }

    async fn find(&self, id: CommentId) -> Result<Option<CommentEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(entries(&mut conn, rows).await?.pop())
    }

    async fn create(
        &self,
        owner: PrincipalId,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            owner_id: *owner.as_uuid(),
            photo_id: comment.photo.get(),
            content: &comment.content,
            created_at: now,
            updated_at: now,
        };
        let stored: CommentRow = diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_reference_error("photo", comment.photo))?;
        Ok(Comment::from(stored))
    }

    async fn update_content(
        &self,
        id: CommentId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = diesel::update(comments::table.find(id.get()))
            .set((comments::content.eq(&content), comments::updated_at.eq(now)))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Comment::from))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
