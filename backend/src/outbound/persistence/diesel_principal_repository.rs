//! PostgreSQL-backed principal directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CreatedPrincipal, NewPrincipal, PrincipalRepository, StoreError};
use crate::domain::{OwnerSummary, PasswordDigest, Principal, PrincipalId, ProfileId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPrincipalRow, NewProfileRow, PrincipalRow};
use super::pool::DbPool;
use super::read_helpers::owner_summaries;
use super::schema::{principals, profiles};

/// Diesel implementation of [`PrincipalRepository`].
#[derive(Debug, Clone)]
pub struct DieselPrincipalRepository {
    pool: DbPool,
}

impl DieselPrincipalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalRepository for DieselPrincipalRepository {
    async fn create_with_profile(
        &self,
        new: NewPrincipal,
        now: DateTime<Utc>,
    ) -> Result<CreatedPrincipal, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let principal_row = NewPrincipalRow {
            id: Uuid::new_v4(),
            username: new.username.as_str(),
            password_digest: new.digest.as_str(),
            is_admin: new.is_admin,
            created_at: now,
        };
        let profile_row = NewProfileRow {
            owner_id: principal_row.id,
            name: String::new(),
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        };

        // Principal and profile commit together or not at all.
        let (row, profile_id) = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let row: PrincipalRow = diesel::insert_into(principals::table)
                        .values(&principal_row)
                        .returning(PrincipalRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let profile_id: i64 = diesel::insert_into(profiles::table)
                        .values(&profile_row)
                        .returning(profiles::id)
                        .get_result(conn)
                        .await?;
                    Ok((row, profile_id))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let (principal, _) = row.into_parts()?;
        Ok(CreatedPrincipal {
            principal,
            profile_id: ProfileId::new(profile_id),
        })
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PrincipalRow> = principals::table
            .filter(principals::id.eq(*id.as_uuid()))
            .select(PrincipalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row.into_parts().map(|(principal, _)| principal))
            .transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(Principal, PasswordDigest)>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PrincipalRow> = principals::table
            .filter(principals::username.eq(username))
            .select(PrincipalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PrincipalRow::into_parts).transpose()
    }

    async fn owner_summary(&self, id: PrincipalId) -> Result<Option<OwnerSummary>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *id.as_uuid();
        let mut summaries = owner_summaries(&mut conn, &[owner]).await?;
        Ok(summaries.remove(&owner))
    }
}
