//! Profile use cases.
//!
//! Profiles are never created by clients; registration creates them.
//! Deleting a profile removes the owning principal as well.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{ProfileEntry, ProfileRepository};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    AccessPolicy, Error, Operation, OwnerOrReadOnly, ProfileForm, ProfileId, ProfileView,
    Requester, authorize,
};

const RESOURCE: &str = "profile";

pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
    clock: Arc<dyn Clock>,
    policy: Box<dyn AccessPolicy>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            policy: Box::new(OwnerOrReadOnly),
        }
    }

    pub async fn list(&self, requester: &Requester) -> Result<Vec<ProfileView>, Error> {
        let entries = self
            .repo
            .list(requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        Ok(entries
            .into_iter()
            .map(|entry| ProfileView::project(entry, requester))
            .collect())
    }

    pub async fn retrieve(&self, requester: &Requester, id: ProfileId) -> Result<ProfileView, Error> {
        self.find(id, requester)
            .await
            .map(|entry| ProfileView::project(entry, requester))
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: ProfileId,
        form: ProfileForm,
    ) -> Result<ProfileView, Error> {
        self.check_detail(requester, id, Operation::Update).await?;
        let changes = form.validate()?;
        self.repo
            .update(id, changes, self.clock.utc())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))?;
        self.retrieve(requester, id).await
    }

    pub async fn delete(&self, requester: &Requester, id: ProfileId) -> Result<(), Error> {
        self.check_detail(requester, id, Operation::Delete).await?;
        let deleted = self
            .repo
            .delete_with_owner(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        if deleted { Ok(()) } else { Err(not_found(id)) }
    }

    async fn find(&self, id: ProfileId, requester: &Requester) -> Result<ProfileEntry, Error> {
        self.repo
            .find(id, requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))
    }

    async fn check_detail(
        &self,
        requester: &Requester,
        id: ProfileId,
        operation: Operation,
    ) -> Result<(), Error> {
        authorize(self.policy.as_ref(), requester, operation, None)?;
        let entry = self.find(id, requester).await?;
        authorize(
            self.policy.as_ref(),
            requester,
            operation,
            Some(&entry.profile.owner),
        )
    }
}

fn not_found(id: ProfileId) -> Error {
    Error::not_found(format!("profile {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockProfileRepository;
    use crate::domain::test_support::{fixture_clock, fixture_now, member};
    use crate::domain::{ErrorCode, PrincipalId, Profile, Username};
    use rstest::rstest;

    fn entry(id: ProfileId, owner: PrincipalId) -> ProfileEntry {
        let now = fixture_now();
        ProfileEntry {
            profile: Profile {
                id,
                owner,
                name: String::new(),
                description: String::new(),
                image: None,
                created_at: now,
                updated_at: now,
            },
            owner_username: Username::new("ada").expect("valid username"),
            photos_count: 0,
            followers_count: 0,
            following_count: 0,
            viewer_follow_id: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn owner_deletes_profile_and_principal() {
        let owner = PrincipalId::random();
        let mut repo = MockProfileRepository::new();
        repo.expect_find()
            .returning(move |id, _| Ok(Some(entry(id, owner))));
        repo.expect_delete_with_owner()
            .times(1)
            .returning(|_| Ok(true));

        let service = ProfileService::new(Arc::new(repo), fixture_clock());
        service
            .delete(&member(owner), ProfileId::new(2))
            .await
            .expect("owner delete succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn others_cannot_rename_a_profile() {
        let owner = PrincipalId::random();
        let mut repo = MockProfileRepository::new();
        repo.expect_find()
            .returning(move |id, _| Ok(Some(entry(id, owner))));
        repo.expect_update().never();

        let service = ProfileService::new(Arc::new(repo), fixture_clock());
        let err = service
            .update(
                &member(PrincipalId::random()),
                ProfileId::new(2),
                ProfileForm {
                    name: Some("Mallory".into()),
                    ..ProfileForm::default()
                },
            )
            .await
            .expect_err("stranger denied");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_delete_never_reaches_store() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find().never();
        repo.expect_delete_with_owner().never();

        let service = ProfileService::new(Arc::new(repo), fixture_clock());
        let err = service
            .delete(&Requester::Anonymous, ProfileId::new(2))
            .await
            .expect_err("anonymous denied");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
