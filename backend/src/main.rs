//! Backend entry-point: loads settings, prepares the store and serves the API.

mod server;

use std::path::Path;

use actix_web::cookie::Key;
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, SessionCookie, build_http_state, create_server};
use tourlens::inbound::http::health::HealthState;
use tourlens::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tourlens::startup::{ServerSettings, bootstrap_admin_on_startup};

/// `Key::derive_from` panics below this length.
const MIN_SESSION_KEY_BYTES: usize = 32;

fn load_session_key(path: &Path, allow_ephemeral: bool) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(std::io::Error::other(format!(
            "session key at {} has {} bytes; at least {MIN_SESSION_KEY_BYTES} are required",
            path.display(),
            bytes.len()
        ))),
        Err(e) => {
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    path.display()
                )))
            }
        }
    }
}

async fn connect_database(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url() else {
        return Ok(None);
    };
    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    let config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool: {}", e.message())))?;
    pool.ping().await.map_err(std::io::Error::other)?;
    info!("database pool ready");
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let key = load_session_key(
        &settings.session_key_file(),
        settings.session_allow_ephemeral,
    )?;

    let session = SessionCookie::new(key, settings.cookie_secure());
    let mut config = ServerConfig::new(session, bind_addr);
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let http_state = build_http_state(&config);
    bootstrap_admin_on_startup(&settings, &http_state.principals)
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state, http_state, config)?;
    server.await
}
