//! Classification of sqlx failures into engine error kinds.

use filetrail_core::error::{AppError, ErrorKind};

/// SQLSTATE for a serialization failure under concurrent transactions.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE for a detected deadlock.
const DEADLOCK_DETECTED: &str = "40P01";

/// Map a sqlx error to an [`AppError`], keeping the cause.
///
/// Pool exhaustion and I/O failures are `Transient`; unique violations and
/// aborted concurrent transactions are `Conflict`; anything else is `Database`.
pub fn map_db_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = classify(&err);
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

fn classify(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => ErrorKind::Transient,
        sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ) =>
        {
            ErrorKind::Conflict
        }
        _ => ErrorKind::Database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_transient() {
        let err = map_db_error("Failed to find version", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::Transient);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_row_not_found_is_database() {
        let err = map_db_error("Failed to find version", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
