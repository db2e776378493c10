//! Registration, login and requester resolution.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{NewPrincipal, PrincipalRepository};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    CurrentUserView, Error, FieldErrors, LoginCredentials, PasswordDigest, Principal, PrincipalId,
    Registration, Requester, Username,
};

const RESOURCE: &str = "principal";

pub struct PrincipalService {
    repo: Arc<dyn PrincipalRepository>,
    clock: Arc<dyn Clock>,
}

impl PrincipalService {
    pub fn new(repo: Arc<dyn PrincipalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Create a principal and its profile.
    pub async fn register(&self, registration: Registration) -> Result<Principal, Error> {
        self.insert(registration.username().clone(), registration.password(), false)
            .await
    }

    /// Verify credentials and return the matching principal.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let found = self
            .repo
            .find_credentials(credentials.username())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        match found {
            Some((principal, digest)) if digest.verify(credentials.password()) => Ok(principal),
            _ => Err(Error::unauthorized(
                "Unable to log in with provided credentials.",
            )),
        }
    }

    /// Resolve a session's principal id into a requester.
    ///
    /// Unknown ids resolve to [`Requester::Anonymous`]; the admin flag is
    /// always read from the store.
    pub async fn resolve(&self, id: Option<PrincipalId>) -> Result<Requester, Error> {
        let Some(id) = id else {
            return Ok(Requester::Anonymous);
        };
        let principal = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        Ok(principal.map_or(Requester::Anonymous, |principal| {
            Requester::Authenticated {
                id: principal.id,
                is_admin: principal.is_admin,
            }
        }))
    }

    /// Describe the signed-in principal.
    pub async fn current_user(&self, requester: &Requester) -> Result<CurrentUserView, Error> {
        let Some(id) = requester.principal_id() else {
            return Err(Error::unauthorized(
                "Authentication credentials were not provided.",
            ));
        };
        let summary = self
            .repo
            .owner_summary(id)
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?
            .ok_or_else(|| Error::unauthorized("Authentication credentials were not provided."))?;
        Ok(CurrentUserView::project(summary, requester.is_admin()))
    }

    /// Create the configured administrator unless the username is taken.
    ///
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, username: Username, password: &str) -> Result<bool, Error> {
        let existing = self
            .repo
            .find_credentials(username.as_str())
            .await
            .map_err(|err| map_store_error(RESOURCE, err))?;
        if existing.is_some() {
            return Ok(false);
        }
        let admin = self.insert(username, password, true).await?;
        info!(principal = %admin.id, username = %admin.username, "bootstrapped administrator");
        Ok(true)
    }

    async fn insert(
        &self,
        username: Username,
        password: &str,
        is_admin: bool,
    ) -> Result<Principal, Error> {
        let new = NewPrincipal {
            username,
            digest: PasswordDigest::derive(password),
            is_admin,
        };
        match self.repo.create_with_profile(new, self.clock.utc()).await {
            Ok(created) => Ok(created.principal),
            Err(err) if err.is_duplicate() => {
                let mut errors = FieldErrors::new();
                errors.push("username", "A user with that username already exists.");
                Err(errors.into())
            }
            Err(err) => Err(map_store_error(RESOURCE, err)),
        }
    }
}
