//! Outbound adapters implementing the store ports.
//!
//! - **memory**: single-lock in-process tables, used without a database URL
//!   and by the test suite.
//! - **persistence**: PostgreSQL repositories on Diesel.

pub mod memory;
pub mod persistence;
