//! Tour use cases.
//!
//! Only administrators create tours. The creator, or any administrator, may
//! then edit or delete them.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{TourEntry, TourRepository};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    AdminOrReadOnly, EndpointPolicies, Error, Operation, OwnerOrAdminOrReadOnly, Requester,
    TourForm, TourId, TourView, authorize,
};

const RESOURCE: &str = "tour";

pub struct TourService {
    repo: Arc<dyn TourRepository>,
    clock: Arc<dyn Clock>,
    policies: EndpointPolicies,
}

impl TourService {
    pub fn new(repo: Arc<dyn TourRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            policies: EndpointPolicies::new(AdminOrReadOnly, OwnerOrAdminOrReadOnly::default()),
        }
    }

    pub async fn list(&self, requester: &Requester) -> Result<Vec<TourView>, Error> {
        let entries = self
            .repo
            .list(requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        Ok(entries
            .into_iter()
            .map(|entry| TourView::project(entry, requester))
            .collect())
    }

    pub async fn retrieve(&self, requester: &Requester, id: TourId) -> Result<TourView, Error> {
        self.find(id, requester)
            .await
            .map(|entry| TourView::project(entry, requester))
    }

    pub async fn create(&self, requester: &Requester, form: TourForm) -> Result<TourView, Error> {
        authorize(
            self.policies.collection.as_ref(),
            requester,
            Operation::Create,
            None,
        )?;
        let owner = requester
            .principal_id()
            .ok_or_else(|| Error::forbidden("Authentication credentials were not provided."))?;
        let now = self.clock.utc();
        let draft = form.validate(now.date_naive(), None)?;
        let tour = self
            .repo
            .create(owner, draft, now)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        self.retrieve(requester, tour.id).await
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: TourId,
        form: TourForm,
    ) -> Result<TourView, Error> {
        let current = self.check_detail(requester, id, Operation::Update).await?;
        let now = self.clock.utc();
        let draft = form.validate(now.date_naive(), Some(current.tour.start_date))?;
        self.repo
            .update(id, draft, now)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))?;
        self.retrieve(requester, id).await
    }

    pub async fn delete(&self, requester: &Requester, id: TourId) -> Result<(), Error> {
        self.check_detail(requester, id, Operation::Delete).await?;
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        if deleted { Ok(()) } else { Err(not_found(id)) }
    }

    async fn find(&self, id: TourId, requester: &Requester) -> Result<TourEntry, Error> {
        self.repo
            .find(id, requester.principal_id())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))
    }

    async fn check_detail(
        &self,
        requester: &Requester,
        id: TourId,
        operation: Operation,
    ) -> Result<TourEntry, Error> {
        let policy = self.policies.detail.as_ref();
        authorize(policy, requester, operation, None)?;
        let entry = self.find(id, requester).await?;
        authorize(policy, requester, operation, Some(&entry.tour.owner))?;
        Ok(entry)
    }
}

fn not_found(id: TourId) -> Error {
    Error::not_found(format!("tour {id} not found"))
}

#[cfg(test)]
#[path = "tour_service_tests.rs"]
mod tests;
