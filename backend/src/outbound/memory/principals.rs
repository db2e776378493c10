//! Principal directory backed by the in-memory tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStore, PrincipalRow};
use crate::domain::ports::{CreatedPrincipal, NewPrincipal, PrincipalRepository, StoreError};
use crate::domain::{
    OwnerSummary, PasswordDigest, Principal, PrincipalId, Profile, ProfileId,
};

#[async_trait]
impl PrincipalRepository for InMemoryStore {
    async fn create_with_profile(
        &self,
        new: NewPrincipal,
        now: DateTime<Utc>,
    ) -> Result<CreatedPrincipal, StoreError> {
        let mut tables = self.lock()?;
        if tables
            .principals
            .values()
            .any(|row| row.principal.username == new.username)
        {
            return Err(StoreError::duplicate("principals_username_key"));
        }

        let principal = Principal {
            id: PrincipalId::random(),
            username: new.username,
            is_admin: new.is_admin,
            created_at: now,
        };
        let profile = tables.profiles.insert_with(|id| Profile {
            id: ProfileId::new(id),
            owner: principal.id,
            name: String::new(),
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        });
        tables.principals.insert(
            principal.id,
            PrincipalRow {
                principal: principal.clone(),
                digest: new.digest,
            },
        );
        Ok(CreatedPrincipal {
            principal,
            profile_id: profile.id,
        })
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.principals.get(&id).map(|row| row.principal.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(Principal, PasswordDigest)>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .principals
            .values()
            .find(|row| row.principal.username.as_str() == username)
            .map(|row| (row.principal.clone(), row.digest.clone())))
    }

    async fn owner_summary(&self, id: PrincipalId) -> Result<Option<OwnerSummary>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.owner_summary(id))
    }
}
