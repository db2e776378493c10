//! PostgreSQL store adapters built on Diesel.
//!
//! Repositories translate between Diesel rows and domain records and hold no
//! business rules. Uniqueness of relationship pairs and cascading deletes
//! are enforced by the schema; the adapters only translate the resulting
//! database errors into [`crate::domain::ports::StoreError`].
//!
//! ```ignore
//! use tourlens::outbound::persistence::{DbPool, DieselPhotoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tourlens")).await?;
//! let photos = DieselPhotoRepository::new(pool);
//! ```

mod diesel_comment_repository;
mod diesel_photo_repository;
mod diesel_principal_repository;
mod diesel_profile_repository;
mod diesel_relationship_repository;
mod diesel_tour_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod read_helpers;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_photo_repository::DieselPhotoRepository;
pub use diesel_principal_repository::DieselPrincipalRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_relationship_repository::DieselRelationshipRepository;
pub use diesel_tour_repository::DieselTourRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
