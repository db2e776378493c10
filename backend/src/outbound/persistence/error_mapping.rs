//! Diesel and pool failures mapped onto [`StoreError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    StoreError::connection(error.message())
}

/// Translate a Diesel failure.
///
/// Unique violations keep the constraint name so callers can tell which
/// pair collided. Foreign key violations without caller context become
/// query errors; see [`map_reference_error`].
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::NotFound => StoreError::query("record not found"),
        _ => StoreError::query("database error"),
    }
}

/// Like [`map_diesel_error`], reporting foreign key violations as a missing
/// `field` reference to `value`.
pub(crate) fn map_reference_error(
    field: &'static str,
    value: impl ToString,
) -> impl FnOnce(DieselError) -> StoreError {
    move |error| match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            debug!(
                constraint = ?info.constraint_name(),
                field, "foreign key violation"
            );
            StoreError::missing_reference(field, value.to_string())
        }
        other => map_diesel_error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint violated".to_owned()))
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert!(
            matches!(err, StoreError::Duplicate { .. }),
            "expected Duplicate, got {err:?}"
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(err, StoreError::Connection { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            StoreError::Query { .. }
        ));
    }

    #[rstest]
    fn foreign_key_violation_names_the_reference() {
        let err = map_reference_error("tour", 42)(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
        ));
        assert_eq!(err, StoreError::missing_reference("tour", "42"));
    }

    #[rstest]
    fn reference_mapping_defers_other_errors() {
        let err = map_reference_error("photo", 1)(database_error(
            DatabaseErrorKind::UniqueViolation,
        ));
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, StoreError::connection("timed out"));
    }
}
