//! Driven ports: the store operations the domain services rely on.
//!
//! Every port reports failures as [`StoreError`] so the services can map
//! them to domain errors in one place.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod photo_repository;
mod principal_repository;
mod profile_repository;
mod relationship_repository;
mod store_error;
mod tour_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentEntry, CommentRepository};
#[cfg(test)]
pub use photo_repository::MockPhotoRepository;
pub use photo_repository::{PhotoEntry, PhotoRepository};
#[cfg(test)]
pub use principal_repository::MockPrincipalRepository;
pub use principal_repository::{CreatedPrincipal, NewPrincipal, PrincipalRepository};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileEntry, ProfileRepository};
pub use relationship_repository::{RelationshipEntry, RelationshipRepository};
pub use store_error::StoreError;
#[cfg(test)]
pub use tour_repository::MockTourRepository;
pub use tour_repository::{TourEntry, TourRepository};
