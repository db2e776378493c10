//! Ownership-scoped access control.
//!
//! Policies are plain predicates over the requester, the operation class and
//! the owner of the record being touched. Services instantiate one policy per
//! endpoint and call [`authorize`] before and after the record lookup:
//!
//! 1. collection/gate check with `owner = None` (anonymous writes stop here);
//! 2. lookup, which may yield `NotFound`;
//! 3. object check with `owner = Some(record.owner)`.

use crate::domain::{Error, PrincipalId};

/// The actor a request runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requester {
    /// No session, or a session whose principal no longer exists.
    #[default]
    Anonymous,
    /// A resolved principal and its administrator flag.
    Authenticated {
        /// Principal the session belongs to.
        id: PrincipalId,
        /// Whether the principal may manage tours.
        is_admin: bool,
    },
}

impl Requester {
    /// Principal id when authenticated.
    #[must_use]
    pub fn principal_id(&self) -> Option<PrincipalId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    /// Authenticated with the administrator flag set; anonymous is never admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { is_admin: true, .. })
    }

    /// Whether this requester owns a record owned by `owner`.
    #[must_use]
    pub fn owns(&self, owner: &PrincipalId) -> bool {
        self.principal_id().as_ref() == Some(owner)
    }
}

/// Operation classes distinguished by the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read one record.
    Retrieve,
    /// Read a collection.
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Read-only operations are permitted to everyone.
    #[must_use]
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Retrieve | Self::List)
    }
}

/// Decide whether `requester` may perform `operation`.
///
/// `owner` is `None` for collection-level checks made before a record is
/// loaded, and `Some` once the target record is known.
pub trait AccessPolicy: Send + Sync {
    /// `true` grants the operation. Implementations must not deny safe
    /// operations and must deny every unsafe one for an anonymous requester.
    fn permit(&self, requester: &Requester, operation: Operation, owner: Option<&PrincipalId>)
    -> bool;
}

/// Safe operations for all; writes only by an authenticated principal that
/// owns the record (or, before lookup, by any authenticated principal).
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrReadOnly;

impl AccessPolicy for OwnerOrReadOnly {
    fn permit(
        &self,
        requester: &Requester,
        operation: Operation,
        owner: Option<&PrincipalId>,
    ) -> bool {
        if operation.is_safe() {
            return true;
        }
        match (requester, owner) {
            (Requester::Anonymous, _) => false,
            (Requester::Authenticated { .. }, None) => true,
            (requester, Some(owner)) => requester.owns(owner),
        }
    }
}

/// Safe operations for all; writes only by administrators.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOrReadOnly;

impl AccessPolicy for AdminOrReadOnly {
    fn permit(&self, requester: &Requester, operation: Operation, _: Option<&PrincipalId>) -> bool {
        operation.is_safe() || requester.is_admin()
    }
}

/// Safe operations for all; writes by any authenticated principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatedOrReadOnly;

impl AccessPolicy for AuthenticatedOrReadOnly {
    fn permit(&self, requester: &Requester, operation: Operation, _: Option<&PrincipalId>) -> bool {
        operation.is_safe() || requester.principal_id().is_some()
    }
}

/// Permit when either inner policy permits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Either<A, B>(pub A, pub B);

impl<A: AccessPolicy, B: AccessPolicy> AccessPolicy for Either<A, B> {
    fn permit(
        &self,
        requester: &Requester,
        operation: Operation,
        owner: Option<&PrincipalId>,
    ) -> bool {
        self.0.permit(requester, operation, owner) || self.1.permit(requester, operation, owner)
    }
}

/// Owners and administrators may write; everyone may read.
pub type OwnerOrAdminOrReadOnly = Either<OwnerOrReadOnly, AdminOrReadOnly>;

/// Collection and detail policies for one endpoint family.
pub struct EndpointPolicies {
    pub collection: Box<dyn AccessPolicy>,
    pub detail: Box<dyn AccessPolicy>,
}

impl EndpointPolicies {
    pub fn new(collection: impl AccessPolicy + 'static, detail: impl AccessPolicy + 'static) -> Self {
        Self {
            collection: Box::new(collection),
            detail: Box::new(detail),
        }
    }
}

/// Turn a policy decision into a result.
///
/// # Examples
/// ```
/// use tourlens::domain::{authorize, ErrorCode, Operation, OwnerOrReadOnly, Requester};
///
/// let err = authorize(&OwnerOrReadOnly, &Requester::Anonymous, Operation::Delete, None)
///     .expect_err("anonymous writes are denied");
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize(
    policy: &dyn AccessPolicy,
    requester: &Requester,
    operation: Operation,
    owner: Option<&PrincipalId>,
) -> Result<(), Error> {
    if policy.permit(requester, operation, owner) {
        Ok(())
    } else if matches!(requester, Requester::Anonymous) {
        Err(Error::forbidden(
            "Authentication credentials were not provided.",
        ))
    } else {
        Err(Error::forbidden(
            "You do not have permission to perform this action.",
        ))
    }
}
