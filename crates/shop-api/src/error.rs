//! # API Error Type
//!
//! Unified error type for shop commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ShopSystem                             │
//! │                                                                         │
//! │  Presentation                 Rust Backend                              │
//! │  ────────────                 ────────────                              │
//! │                                                                         │
//! │  checkout(payment)                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ────── ValidationError ─────────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Business rule? ── CoreError::InsufficientStock ─ ApiError ─────►│  │
//! │  │         │                                        ▲               │  │
//! │  │         ▼                                        │               │  │
//! │  │  Storage? ──────── DbError (logged, generic) ────┘               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "CONFLICT",                                                  │
//! │    "message": "Not enough stock for SSD 1TB: available 1, requested 2" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and business-rule messages reach the user verbatim. Storage
//! failures are logged with their cause and replaced by a generic message.

use serde::Serialize;
use tracing::error;
use ts_rs::TS;

use shop_core::{CoreError, ValidationError};
use shop_db::{AuthError, DbError, StoreError};

/// API error returned from shop commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 1001"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input had the wrong shape or format
    ValidationError,

    /// Referenced entity is missing or already in a terminal state
    NotFound,

    /// Duplicate key or not enough stock
    Conflict,

    /// Storage failed for reasons unrelated to the input
    StorageUnavailable,

    /// Wrong credentials, or the session lacks the role
    Unauthorized,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageUnavailable, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                error!("Constraint violation: {}", message);
                ApiError::validation("Invalid value")
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::unavailable("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ApiError::unavailable("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::unavailable("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::unavailable("Database transaction failed")
            }
            DbError::Busy => {
                error!("Database busy");
                ApiError::unavailable("Database is busy, please try again")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::unavailable("Database is busy, please try again")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::unavailable("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(code) => ApiError::not_found("Product", &code),
            CoreError::NotInCart(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::InsufficientStock { .. } | CoreError::StockLimitExceeded { .. } => {
                ApiError::conflict(err.to_string())
            }
            CoreError::InvalidQuantity(_)
            | CoreError::EmptyCart
            | CoreError::MissingBankDetails
            | CoreError::Validation(_) => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(e) => e.into(),
            StoreError::Storage(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AuthError::DuplicateUsername => ApiError::conflict(err.to_string()),
            AuthError::Rejected(e) => e.into(),
            AuthError::Storage(e) => e.into(),
            AuthError::Hashing => {
                error!("Password hashing failed");
                ApiError::unavailable("Could not store the account, please try again")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rules_map_to_conflict_and_not_found() {
        let err = ApiError::from(CoreError::InsufficientStock {
            product: "SSD 1TB".to_string(),
            available: 1,
            requested: 2,
        });
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Not enough stock for SSD 1TB: available 1, requested 2");

        let err = ApiError::from(CoreError::NotInCart("1001".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item 1001 not found in cart");

        let err = ApiError::from(CoreError::ProductNotFound("1001".to_string()));
        assert_eq!(err.message, "Product not found: 1001");
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: sales".to_string()));
        assert_eq!(err.code, ErrorCode::StorageUnavailable);
        assert!(!err.message.contains("sales"));

        let err = ApiError::from(StoreError::Storage(DbError::Busy));
        assert_eq!(err.code, ErrorCode::StorageUnavailable);
    }

    #[test]
    fn test_duplicates_are_conflicts() {
        let err = ApiError::from(DbError::duplicate("code", "1001"));
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "code '1001' already exists");

        let err = ApiError::from(AuthError::DuplicateUsername);
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_auth_errors() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Invalid username or password");

        let err = ApiError::from(AuthError::Rejected(ValidationError::TooShort {
            field: "Username".to_string(),
            min: 3,
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Username must be at least 3 characters long");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&ApiError::conflict("Username already exists")).unwrap();
        assert_eq!(json, r#"{"code":"CONFLICT","message":"Username already exists"}"#);
    }
}
