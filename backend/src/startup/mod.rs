//! Startup wiring: layered settings and administrator bootstrap.

mod admin;
mod config;

pub use admin::{StartupError, bootstrap_admin_on_startup};
pub use config::ServerSettings;
