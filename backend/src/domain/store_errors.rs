//! Translation of store failures into domain errors.

use tracing::debug;

use crate::domain::ports::StoreError;
use crate::domain::{Error, duplicate_error, missing_reference_error};

/// Map a store failure raised while serving `resource`.
///
/// Constraint violations become validation errors; infrastructure failures
/// become `service_unavailable` or `internal_error`.
pub(crate) fn map_store_error(resource: &str, error: StoreError) -> Error {
    debug!(resource, kind = error.kind(), %error, "store operation failed");
    match error {
        StoreError::Connection { message } => {
            Error::service_unavailable(format!("{resource} store unavailable: {message}"))
        }
        StoreError::Query { message } => {
            Error::internal(format!("{resource} store error: {message}"))
        }
        StoreError::Duplicate { .. } => duplicate_error(),
        StoreError::MissingReference { field, value } => missing_reference_error(&field, &value),
    }
}
