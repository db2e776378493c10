//! Errors shared by every store port.

use super::define_port_error;

define_port_error! {
    /// Failures reported by store adapters.
    pub enum StoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "store connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { constraint: String } => "duplicate record rejected by {constraint}",
        /// A referenced record does not exist.
        MissingReference { field: String, value: String } =>
            "{field} references missing record {value}",
    }
}
