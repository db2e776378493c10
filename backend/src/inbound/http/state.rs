//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CommentRepository, PhotoRepository, PrincipalRepository, ProfileRepository,
    RelationshipRepository, TourRepository,
};
use crate::domain::{
    Attendances, CommentService, Follows, Likes, PhotoService, PrincipalService, ProfileService,
    RelationshipService, TourService,
};

/// Parameter object bundling every store port the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub principals: Arc<dyn PrincipalRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub tours: Arc<dyn TourRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn RelationshipRepository<Likes>>,
    pub followers: Arc<dyn RelationshipRepository<Follows>>,
    pub attendances: Arc<dyn RelationshipRepository<Attendances>>,
}

impl HttpStatePorts {
    /// Use one store for every port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use tourlens::inbound::http::state::HttpStatePorts;
    /// use tourlens::outbound::memory::InMemoryStore;
    ///
    /// let ports = HttpStatePorts::from_store(Arc::new(InMemoryStore::new()));
    /// # let _ = ports;
    /// ```
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PrincipalRepository
            + ProfileRepository
            + PhotoRepository
            + TourRepository
            + CommentRepository
            + RelationshipRepository<Likes>
            + RelationshipRepository<Follows>
            + RelationshipRepository<Attendances>
            + 'static,
    {
        Self {
            principals: store.clone(),
            profiles: store.clone(),
            photos: store.clone(),
            tours: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            followers: store.clone(),
            attendances: store,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub principals: Arc<PrincipalService>,
    pub profiles: Arc<ProfileService>,
    pub photos: Arc<PhotoService>,
    pub tours: Arc<TourService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<RelationshipService<Likes>>,
    pub followers: Arc<RelationshipService<Follows>>,
    pub attendances: Arc<RelationshipService<Attendances>>,
}

impl HttpState {
    /// Wire every service to its port and the shared clock.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            principals,
            profiles,
            photos,
            tours,
            comments,
            likes,
            followers,
            attendances,
        } = ports;
        Self {
            principals: Arc::new(PrincipalService::new(principals, clock.clone())),
            profiles: Arc::new(ProfileService::new(profiles, clock.clone())),
            photos: Arc::new(PhotoService::new(photos, clock.clone())),
            tours: Arc::new(TourService::new(tours, clock.clone())),
            comments: Arc::new(CommentService::new(comments, clock.clone())),
            likes: Arc::new(RelationshipService::new(likes, clock.clone())),
            followers: Arc::new(RelationshipService::new(followers, clock.clone())),
            attendances: Arc::new(RelationshipService::new(attendances, clock)),
        }
    }
}

/// Access to the relationship service of one kind.
///
/// Lets the relationship handlers stay generic over the kind.
pub trait RelationshipServices<K: crate::domain::RelationshipKind> {
    fn relationship_service(&self) -> &RelationshipService<K>;
}

impl RelationshipServices<Likes> for HttpState {
    fn relationship_service(&self) -> &RelationshipService<Likes> {
        &self.likes
    }
}

impl RelationshipServices<Follows> for HttpState {
    fn relationship_service(&self) -> &RelationshipService<Follows> {
        &self.followers
    }
}

impl RelationshipServices<Attendances> for HttpState {
    fn relationship_service(&self) -> &RelationshipService<Attendances> {
        &self.attendances
    }
}
