//! Conversions from external infrastructure errors into domain errors.

use fieldmachine_domain::FieldMachineError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FieldMachineError);

impl From<InfraError> for FieldMachineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FieldMachineError> for InfraError {
    fn from(value: FieldMachineError) -> Self {
        Self(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let mapped = match err {
            RE::SqliteFailure(inner, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match inner.code {
                    ErrorCode::DatabaseBusy => {
                        FieldMachineError::Database("database is busy".into())
                    }
                    ErrorCode::DatabaseLocked => {
                        FieldMachineError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        FieldMachineError::Conflict(format!("constraint violation: {message}"))
                    }
                    _ => FieldMachineError::Database(format!("SQLite error: {message}")),
                }
            }
            RE::QueryReturnedNoRows => FieldMachineError::NotFound("no rows returned".into()),
            other => FieldMachineError::Database(format!("SQLite error: {other}")),
        };
        Self(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        Self(FieldMachineError::Database(format!("connection pool error: {err}")))
    }
}

impl From<tokio::task::JoinError> for InfraError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self(FieldMachineError::Internal(format!("task join error: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: FieldMachineError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(err, FieldMachineError::NotFound(_)));
    }

    #[test]
    fn constraint_violation_maps_to_conflict() {
        let inner = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT);
        let err: FieldMachineError =
            InfraError::from(SqlError::SqliteFailure(inner, Some("unique".into()))).into();
        assert!(matches!(err, FieldMachineError::Conflict(_)));
    }
}
