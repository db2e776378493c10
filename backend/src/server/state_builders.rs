//! Builders for the HTTP state from the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use tourlens::inbound::http::state::{HttpState, HttpStatePorts};
use tourlens::outbound::memory::InMemoryStore;
use tourlens::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselPhotoRepository, DieselPrincipalRepository,
    DieselProfileRepository, DieselRelationshipRepository, DieselTourRepository,
};

use super::ServerConfig;

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    let relationships = Arc::new(DieselRelationshipRepository::new(pool.clone()));
    HttpStatePorts {
        principals: Arc::new(DieselPrincipalRepository::new(pool.clone())),
        profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
        photos: Arc::new(DieselPhotoRepository::new(pool.clone())),
        tours: Arc::new(DieselTourRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        likes: relationships.clone(),
        followers: relationships.clone(),
        attendances: relationships,
    }
}

/// Build the HTTP state, backed by PostgreSQL when a pool is configured and
/// by a process-local store otherwise.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool),
        None => {
            info!("no database configured; using the in-memory store");
            HttpStatePorts::from_store(Arc::new(InMemoryStore::new()))
        }
    };
    web::Data::new(HttpState::new(ports, Arc::new(DefaultClock)))
}
