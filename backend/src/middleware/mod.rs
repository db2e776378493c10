//! Request middleware.
//!
//! Purpose: assign each request a trace identifier that errors and logs can
//! carry.

pub mod trace;

pub use trace::Trace;
