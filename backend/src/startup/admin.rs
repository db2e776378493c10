//! Administrator bootstrap at startup.

use std::net::AddrParseError;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{PrincipalService, Username, UsernameValidationError};
use crate::startup::ServerSettings;

/// Errors returned while preparing the server from its settings.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    /// The configured administrator name is not a valid username.
    #[error("invalid administrator username: {0}")]
    AdminUsername(#[from] UsernameValidationError),
    /// Creating the administrator failed in the store.
    #[error("administrator bootstrap failed: {0}")]
    AdminBootstrap(#[from] crate::domain::Error),
}

/// Create the configured administrator unless the username already exists.
///
/// Returns whether an account was created. Nothing happens when either
/// credential is missing.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use tourlens::domain::PrincipalService;
/// use tourlens::outbound::memory::InMemoryStore;
/// use tourlens::startup::{ServerSettings, bootstrap_admin_on_startup};
///
/// # async fn run(settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let principals = PrincipalService::new(Arc::new(InMemoryStore::new()), Arc::new(DefaultClock));
/// let created = bootstrap_admin_on_startup(&settings, &principals).await?;
/// # let _ = created;
/// # Ok(())
/// # }
/// ```
pub async fn bootstrap_admin_on_startup(
    settings: &ServerSettings,
    principals: &PrincipalService,
) -> Result<bool, StartupError> {
    let (username, password) = match (
        settings.admin_username.as_deref(),
        settings.admin_password.as_deref(),
    ) {
        (Some(username), Some(password)) => (username, password),
        (None, None) => {
            info!(reason = "unconfigured", "administrator bootstrap skipped");
            return Ok(false);
        }
        _ => {
            warn!("administrator bootstrap needs both a username and a password; skipping");
            return Ok(false);
        }
    };

    let username = Username::new(username)?;
    let created = principals.ensure_admin(username.clone(), password).await?;
    if !created {
        info!(%username, "administrator already present; skipping");
    }
    Ok(created)
}
