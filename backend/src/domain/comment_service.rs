//! Comment use cases.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{CommentEntry, CommentRepository};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    AuthenticatedOrReadOnly, CommentId, CommentView, EndpointPolicies, Error, Operation,
    OwnerOrReadOnly, PhotoId, Requester, authorize, validate_comment_content, validate_new_comment,
};

const RESOURCE: &str = "comment";

pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
    policies: EndpointPolicies,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            policies: EndpointPolicies::new(AuthenticatedOrReadOnly, OwnerOrReadOnly),
        }
    }

    /// Comments newest first, optionally for one photo only.
    pub async fn list(
        &self,
        requester: &Requester,
        photo: Option<PhotoId>,
    ) -> Result<Vec<CommentView>, Error> {
        let entries = self
            .repo
            .list(photo)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        Ok(entries
            .into_iter()
            .map(|entry| CommentView::project(entry, requester))
            .collect())
    }

    pub async fn retrieve(&self, requester: &Requester, id: CommentId) -> Result<CommentView, Error> {
        self.find(id)
            .await
            .map(|entry| CommentView::project(entry, requester))
    }

    pub async fn create(
        &self,
        requester: &Requester,
        photo: Option<PhotoId>,
        content: Option<String>,
    ) -> Result<CommentView, Error> {
        authorize(
            self.policies.collection.as_ref(),
            requester,
            Operation::Create,
            None,
        )?;
        let owner = requester
            .principal_id()
            .ok_or_else(|| Error::forbidden("Authentication credentials were not provided."))?;
        let comment = validate_new_comment(photo, content)?;
        let stored = self
            .repo
            .create(owner, comment, self.clock.utc())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        self.retrieve(requester, stored.id).await
    }

    /// Replace the comment text. The photo is fixed at creation.
    pub async fn update(
        &self,
        requester: &Requester,
        id: CommentId,
        content: Option<String>,
    ) -> Result<CommentView, Error> {
        self.check_detail(requester, id, Operation::Update).await?;
        let content = validate_comment_content(content)?;
        self.repo
            .update_content(id, content, self.clock.utc())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))?;
        self.retrieve(requester, id).await
    }

    pub async fn delete(&self, requester: &Requester, id: CommentId) -> Result<(), Error> {
        self.check_detail(requester, id, Operation::Delete).await?;
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        if deleted { Ok(()) } else { Err(not_found(id)) }
    }

    async fn find(&self, id: CommentId) -> Result<CommentEntry, Error> {
        self.repo
            .find(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| not_found(id))
    }

    async fn check_detail(
        &self,
        requester: &Requester,
        id: CommentId,
        operation: Operation,
    ) -> Result<(), Error> {
        let policy = self.policies.detail.as_ref();
        authorize(policy, requester, operation, None)?;
        let entry = self.find(id).await?;
        authorize(policy, requester, operation, Some(&entry.comment.owner))
    }
}

fn not_found(id: CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}
