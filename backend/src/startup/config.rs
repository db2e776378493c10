//! Server configuration loaded via OrthoConfig.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use super::StartupError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Values controlling how the server binds, stores data and signs sessions.
///
/// Each field may come from the command line, a `TOURLENS_*` environment
/// variable or a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TOURLENS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a generated session key when the file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`; defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Administrator created at startup when both credentials are set.
    pub admin_username: Option<String>,
    /// Password for [`Self::admin_username`].
    pub admin_password: Option<String>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, StartupError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| StartupError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Database URL with surrounding whitespace removed; blank counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Return the session key path, falling back to the mounted secret.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "TOURLENS_BIND_ADDR",
        "TOURLENS_DATABASE_URL",
        "TOURLENS_DB_MAX_CONNECTIONS",
        "TOURLENS_SESSION_KEY_FILE",
        "TOURLENS_SESSION_ALLOW_EPHEMERAL",
        "TOURLENS_COOKIE_SECURE",
        "TOURLENS_ADMIN_USERNAME",
        "TOURLENS_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("tourlens")]).expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(!settings.session_allow_ephemeral);
        assert!(settings.cookie_secure());
        assert!(settings.admin_username.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("TOURLENS_BIND_ADDR", "127.0.0.1:9000"),
            ("TOURLENS_DATABASE_URL", "postgres://localhost/tourlens"),
            ("TOURLENS_DB_MAX_CONNECTIONS", "4"),
            ("TOURLENS_SESSION_KEY_FILE", "/tmp/session_key"),
            ("TOURLENS_SESSION_ALLOW_EPHEMERAL", "true"),
            ("TOURLENS_COOKIE_SECURE", "false"),
            ("TOURLENS_ADMIN_USERNAME", "curator"),
            ("TOURLENS_ADMIN_PASSWORD", "analytical"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/tourlens")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/session_key"));
        assert!(settings.session_allow_ephemeral);
        assert!(!settings.cookie_secure());
        assert_eq!(settings.admin_username.as_deref(), Some("curator"));
    }

    #[rstest]
    fn blank_database_url_counts_as_unset() {
        let _guard = lock_env(env_with(&[("TOURLENS_DATABASE_URL", "  ")]));
        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(env_with(&[("TOURLENS_BIND_ADDR", "localhost")]));
        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("hostnames are not socket addresses");
        assert!(err.to_string().contains("localhost"));
    }
}
