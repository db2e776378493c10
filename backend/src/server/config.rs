//! Server configuration: the session cookie policy, the listener address and
//! the optional database pool.

use std::net::SocketAddr;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use tourlens::outbound::persistence::DbPool;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// How the `session` cookie is signed, encrypted and scoped.
#[derive(Clone)]
pub struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    /// Cookie policy with `SameSite=Lax`.
    #[must_use]
    pub fn new(key: Key, secure: bool) -> Self {
        Self {
            key,
            secure,
            same_site: SameSite::Lax,
        }
    }

    /// Private (encrypted) cookie sessions expiring after two hours.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.into())
            .cookie_path("/".into())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionCookie,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionCookie, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, every store port is backed by PostgreSQL instead of
    /// the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
