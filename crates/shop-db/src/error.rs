//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← categorised from the driver's error kind,     │
//! │       │                  never from message text                        │
//! │       ▼                                                                 │
//! │  StoreError ← a DbError or a CoreError rule violation                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (shop-api) ← ValidationError / NotFound / Conflict /         │
//! │                        StorageUnavailable                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shop_core::{CoreError, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLite primary result codes for a locked database (SQLITE_BUSY,
/// SQLITE_LOCKED) and the extended SQLITE_BUSY_SNAPSHOT.
const SQLITE_BUSY_CODES: &[&str] = &["5", "6", "517"];

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Service already completed or cancelled by someone else
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Registering a taken username
    /// - Adding a product with an existing code
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (negative stock, bad enum text, ...).
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin, commit or roll back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The database stayed locked past `busy_timeout`.
    #[error("Database is busy")]
    Busy,

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    /// Whether the failure is the storage layer's fault rather than the
    /// caller's input.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_)
                | DbError::MigrationFailed(_)
                | DbError::QueryFailed(_)
                | DbError::TransactionFailed(_)
                | DbError::Busy
                | DbError::PoolExhausted
                | DbError::Internal(_)
        )
    }

    /// Re-labels a unique violation with the field and value the caller
    /// was writing; other errors pass through.
    pub(crate) fn on_duplicate(self, field: &str, value: &str) -> Self {
        if self.is_unique_violation() {
            DbError::duplicate(field, value)
        } else {
            self
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound          → DbError::NotFound
/// Database + UniqueViolation kind   → DbError::UniqueViolation
/// Database + ForeignKeyViolation    → DbError::ForeignKeyViolation
/// Database + CheckViolation         → DbError::CheckViolation
/// Database + SQLITE_BUSY / LOCKED   → DbError::Busy
/// sqlx::Error::PoolTimedOut         → DbError::PoolExhausted
/// Other                             → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    field: db_err.constraint().unwrap_or("unknown").to_string(),
                    value: "unknown".to_string(),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    DbError::CheckViolation {
                        message: db_err.message().to_string(),
                    }
                }
                _ => match db_err.code() {
                    Some(code) if SQLITE_BUSY_CODES.contains(&&*code) => DbError::Busy,
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                },
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Store Error
// =============================================================================

/// Failure of a store operation that applies business rules before (or
/// while) touching the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request broke a business rule; nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The database failed; any transaction was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Rejected(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(DbError::from(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(DbError::from(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(DbError::from(sqlx::Error::PoolClosed).is_unavailable());
        assert!(DbError::Busy.is_unavailable());
    }

    #[test]
    fn test_on_duplicate_relabels_unique_violations_only() {
        let err = DbError::duplicate("products.code", "unknown").on_duplicate("code", "1001");
        assert_eq!(err.to_string(), "Duplicate code: '1001' already exists");

        let err = DbError::Busy.on_duplicate("code", "1001");
        assert!(matches!(err, DbError::Busy));
    }

    #[test]
    fn test_validation_error_is_rejected() {
        let err: StoreError = ValidationError::Required {
            field: "Price".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            StoreError::Rejected(CoreError::Validation(_))
        ));
    }
}
