//! Error handling for petshelter-store
//!
//! Wraps petshelter-core ExError with store-specific helpers

use petshelter_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// SQLite constraint failures keep their own kind so that callers can tell
/// a rejected row apart from a broken database.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => ExErrorKind::ConstraintViolation,
        Some(ErrorCode::CannotOpen)
        | Some(ErrorCode::ReadOnly)
        | Some(ErrorCode::DiskFull)
        | Some(ErrorCode::NotADatabase) => ExErrorKind::StorageUnavailable,
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a database that could not be opened or configured
pub fn storage_unavailable(path: &Path, source: ExError) -> ExError {
    ExError::new(ExErrorKind::StorageUnavailable)
        .with_op("open_store")
        .with_message(format!("Cannot open pet database at {}", path.display()))
        .with_source(source)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a lock that a panicking thread left poisoned
pub fn lock_poisoned(operation: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(operation.to_string())
        .with_message("Store lock poisoned by a panicked writer")
}

/// Create an error for a stored value outside the column's domain
pub fn corrupt_row(column: &str, value: i64) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("read_pet")
        .with_message(format!("Column {} holds out-of-range value {}", column, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_failure_maps_to_constraint_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x TEXT NOT NULL)").unwrap();
        let err = conn
            .execute("INSERT INTO t (x) VALUES (NULL)", [])
            .unwrap_err();
        assert_eq!(from_rusqlite(err).kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_syntax_error_maps_to_persistence() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELEC 1", []).unwrap_err();
        assert_eq!(from_rusqlite(err).kind(), ExErrorKind::Persistence);
    }
}
