//! Photo use cases.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::PhotoRepository;
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    AuthenticatedOrReadOnly, EndpointPolicies, Error, Operation, OwnerOrReadOnly, PhotoForm,
    PhotoId, PhotoView, Requester, authorize,
};

const RESOURCE: &str = "photo";

/// Photo service: access checks, validation and projection around the store.
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository>,
    clock: Arc<dyn Clock>,
    policies: EndpointPolicies,
}

impl PhotoService {
    pub fn new(repo: Arc<dyn PhotoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            policies: EndpointPolicies::new(AuthenticatedOrReadOnly, OwnerOrReadOnly),
        }
    }

    pub async fn list(&self, requester: &Requester) -> Result<Vec<PhotoView>, Error> {
        let entries = self
            .repo
            .list(requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        Ok(entries
            .into_iter()
            .map(|entry| PhotoView::project(entry, requester))
            .collect())
    }

    pub async fn retrieve(&self, requester: &Requester, id: PhotoId) -> Result<PhotoView, Error> {
        self.repo
            .find(id, requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .map(|entry| PhotoView::project(entry, requester))
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, requester: &Requester, form: PhotoForm) -> Result<PhotoView, Error> {
        authorize(
            self.policies.collection.as_ref(),
            requester,
            Operation::Create,
            None,
        )?;
        let owner = requester
            .principal_id()
            .ok_or_else(|| Error::forbidden("Authentication credentials were not provided."))?;
        let draft = form.validate()?;
        let photo = self
            .repo
            .create(owner, draft, self.clock.utc())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        self.retrieve(requester, photo.id).await
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: PhotoId,
        form: PhotoForm,
    ) -> Result<PhotoView, Error> {
        self.check_detail(requester, id, Operation::Update).await?;
        let draft = form.validate()?;
        self.repo
            .update(id, draft, self.clock.utc())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))?;
        self.retrieve(requester, id).await
    }

    pub async fn delete(&self, requester: &Requester, id: PhotoId) -> Result<(), Error> {
        self.check_detail(requester, id, Operation::Delete).await?;
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        if deleted { Ok(()) } else { Err(not_found(id)) }
    }

    /// Gate, look up, then check ownership of the stored record.
    async fn check_detail(
        &self,
        requester: &Requester,
        id: PhotoId,
        operation: Operation,
    ) -> Result<(), Error> {
        let policy = self.policies.detail.as_ref();
        authorize(policy, requester, operation, None)?;
        let entry = self
            .repo
            .find(id, None)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))?;
        authorize(policy, requester, operation, Some(&entry.photo.owner))
    }
}

fn not_found(id: PhotoId) -> Error {
    Error::not_found(format!("photo {id} not found"))
}

#[cfg(test)]
#[path = "photo_service_tests.rs"]
mod tests;
