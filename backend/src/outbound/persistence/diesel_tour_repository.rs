//! PostgreSQL-backed tour repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{StoreError, TourEntry, TourRepository};
use crate::domain::{PrincipalId, Tour, TourDraft, TourId};

use super::error_mapping::{map_diesel_error, map_pool_error, map_reference_error};
use super::models::{NewTourRow, TourRow, TourUpdate, image_to_json, price_to_column};
use super::pool::DbPool;
use super::read_helpers::{count_for, owner_of, owner_summaries, relationship_for};
use super::schema::{attendances, tours};

/// Diesel implementation of [`TourRepository`].
#[derive(Debug, Clone)]
pub struct DieselTourRepository {
    pool: DbPool,
}

impl DieselTourRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn entries(
    conn: &mut AsyncPgConnection,
    rows: Vec<TourRow>,
    viewer: Option<PrincipalId>,
) -> Result<Vec<TourEntry>, StoreError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let owners: Vec<Uuid> = rows.iter().map(|row| row.owner_id).collect();
    let owners = owner_summaries(conn, &owners).await?;

    let attendance_counts: HashMap<i64, i64> = attendances::table
        .filter(attendances::tour_id.eq_any(&ids))
        .group_by(attendances::tour_id)
        .select((attendances::tour_id, count_star()))
        .load::<(i64, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .collect();
    let viewer_attendances: HashMap<i64, i64> = match viewer {
        Some(viewer) => attendances::table
            .filter(attendances::owner_id.eq(*viewer.as_uuid()))
            .filter(attendances::tour_id.eq_any(&ids))
            .select((attendances::tour_id, attendances::id))
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
            Ok(TourEntry {
                tour: Tour::try_from(row)?,
                owner,
                attendance_count: count_for(&attendance_counts, &id),
                viewer_attendance_id: relationship_for(&viewer_attendances, &id),
            })
        })
        .collect()
}

#[async_trait]
impl TourRepository for DieselTourRepository {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<TourEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TourRow> = tours::table
            .select(TourRow::as_select())
            .order((tours::created_at.desc(), tours::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        entries(&mut conn, rows, viewer).await
    }

    async fn find(
        &self,
        id: TourId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<TourEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TourRow> = tours::table
            .find(id.get())
            .select(TourRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(entries(&mut conn, rows, viewer).await?.pop())
    }

    async fn create(
        &self,
        owner: PrincipalId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Tour, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTourRow {
            owner_id: *owner.as_uuid(),
            title: &draft.title,
            description: &draft.description,
            country: &draft.country,
            city: &draft.city,
            price_cents: price_to_column(draft.price)?,
            guide: &draft.guide,
            start_date: draft.start_date,
            end_date: draft.end_date,
            booking_means: &draft.booking_means,
            image: image_to_json(draft.image.as_ref())?,
            created_at: now,
            updated_at: now,
        };
        let stored: TourRow = diesel::insert_into(tours::table)
            .values(&row)
            .returning(TourRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_reference_error("owner", owner))?;
        Tour::try_from(stored)
    }

    async fn update(
        &self,
        id: TourId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Tour>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = TourUpdate {
            title: &draft.title,
            description: &draft.description,
            country: &draft.country,
            city: &draft.city,
            price_cents: price_to_column(draft.price)?,
            guide: &draft.guide,
            start_date: draft.start_date,
            end_date: draft.end_date,
            booking_means: &draft.booking_means,
            image: image_to_json(draft.image.as_ref())?,
            updated_at: now,
        };
        let row: Option<TourRow> = diesel::update(tours::table.find(id.get()))
            .set(&update)
            .returning(TourRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Tour::try_from).transpose()
    }

    async fn delete(&self, id: TourId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tours::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
