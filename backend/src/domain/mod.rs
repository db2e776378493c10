//! Domain model, access control and use cases.
//!
//! Purpose: hold every rule that does not depend on a transport or a store.
//! Inbound adapters translate requests into calls on the services here;
//! outbound adapters implement the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Requester, Operation, AccessPolicy and friends: the access controller.
//! - Profile, Photo, Tour, Comment, Relationship: stored records and forms.
//! - *View: read models projected for a requester.
//! - *Service: use cases combining the above with the store ports.

mod access;
pub mod auth;
mod comment;
mod comment_service;
pub mod error;
mod ids;
mod image;
pub mod listing;
mod photo;
mod photo_service;
pub mod ports;
mod principal;
mod principal_service;
mod profile;
mod profile_service;
mod projection;
mod relationship;
mod relationship_service;
mod store_errors;
pub mod tour;
mod tour_service;
mod trace_id;
pub(crate) mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::access::{
    AccessPolicy, AdminOrReadOnly, AuthenticatedOrReadOnly, Either, EndpointPolicies, Operation,
    OwnerOrAdminOrReadOnly, OwnerOrReadOnly, Requester, authorize,
};
pub use self::auth::{LoginCredentials, LoginValidationError, PasswordDigest, Registration};
pub use self::comment::{Comment, NewComment, validate_comment_content, validate_new_comment};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CommentId, PhotoId, PrincipalId, ProfileId, RelationshipId, TourId};
pub use self::image::{ImageDescriptor, MAX_IMAGE_BYTES, MAX_IMAGE_DIMENSION, validate_image};
pub use self::listing::{LISTING_FIELDS, ListingFields};
pub use self::photo::{Photo, PhotoDraft, PhotoForm};
pub use self::photo_service::PhotoService;
pub use self::principal::{OwnerSummary, Principal, Username, UsernameValidationError};
pub use self::principal_service::PrincipalService;
pub use self::profile::{Profile, ProfileChanges, ProfileForm};
pub use self::profile_service::ProfileService;
pub use self::projection::{
    CommentView, CurrentUserView, PhotoView, ProfileView, RelationshipView, TourView,
};
pub use self::relationship::{Attendances, Follows, Likes, Relationship, RelationshipKind};
pub use self::relationship_service::RelationshipService;
pub use self::tour::{Price, Tour, TourDraft, TourForm};
pub use self::tour_service::TourService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{
    FieldErrors, POSSIBLE_DUPLICATE, duplicate_error, missing_reference_error,
};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
