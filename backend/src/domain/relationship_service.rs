//! Like, follow and attendance use cases, shared across kinds.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{RelationshipEntry, RelationshipRepository};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    AuthenticatedOrReadOnly, EndpointPolicies, Error, Operation, OwnerOrReadOnly, RelationshipId,
    RelationshipKind, RelationshipView, Requester, authorize,
};

pub struct RelationshipService<K: RelationshipKind> {
    repo: Arc<dyn RelationshipRepository<K>>,
    clock: Arc<dyn Clock>,
    policies: EndpointPolicies,
}

impl<K: RelationshipKind> RelationshipService<K> {
    pub fn new(repo: Arc<dyn RelationshipRepository<K>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            policies: EndpointPolicies::new(AuthenticatedOrReadOnly, OwnerOrReadOnly),
        }
    }

    pub async fn list(&self) -> Result<Vec<RelationshipView<K>>, Error> {
        let entries = self
            .repo
            .list()
            .await
            .map_err(|err| map_store_error(K::RESOURCE, err))?;
        Ok(entries.into_iter().map(RelationshipView::project).collect())
    }

    pub async fn retrieve(&self, id: RelationshipId) -> Result<RelationshipView<K>, Error> {
        self.find(id).await.map(RelationshipView::project)
    }

    /// Record that the requester relates to `target`.
    ///
    /// A repeated pair is reported as a possible duplicate and leaves the
    /// store untouched.
    pub async fn create(
        &self,
        requester: &Requester,
        target: K::Target,
    ) -> Result<RelationshipView<K>, Error> {
        authorize(
            self.policies.collection.as_ref(),
            requester,
            Operation::Create,
            None,
        )?;
        let owner = requester
            .principal_id()
            .ok_or_else(|| Error::forbidden("Authentication credentials were not provided."))?;
        let created = self
            .repo
            .create(owner, target, self.clock.utc())
            .await
            .map_err(|err| map_store_error(K::RESOURCE, err))?;
        self.retrieve(created.id).await
    }

    pub async fn delete(&self, requester: &Requester, id: RelationshipId) -> Result<(), Error> {
        let policy = self.policies.detail.as_ref();
        authorize(policy, requester, Operation::Delete, None)?;
        let entry = self.find(id).await?;
        authorize(
            policy,
            requester,
            Operation::Delete,
            Some(&entry.relationship.owner),
        )?;
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|err| map_store_error(K::RESOURCE, err))?;
        if deleted { Ok(()) } else { Err(not_found::<K>(id)) }
    }

    async fn find(&self, id: RelationshipId) -> Result<RelationshipEntry<K>, Error> {
        self.repo
            .find(id)
            .await
            .map_err(|err| map_store_error(K::RESOURCE, err))?
            .ok_or_else(|| not_found::<K>(id))
    }
}

fn not_found<K: RelationshipKind>(id: RelationshipId) -> Error {
    Error::not_found(format!("{} {id} not found", K::RESOURCE))
}
