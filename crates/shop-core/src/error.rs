//! # Error Types
//!
//! Domain-specific error types for shop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shop-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shop-db errors                                                        │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── StoreError       - CoreError | DbError from store operations      │
//! │                                                                         │
//! │  shop-api errors                                                       │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product does not exist or has been soft-deleted.
    #[error("Product {0} not found")]
    ProductNotFound(String),

    /// Live stock cannot cover the requested quantity at checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: 1001 × 2
    ///      │
    ///      ▼
    /// Checkout re-reads live stock: 1
    ///      │
    ///      ▼
    /// InsufficientStock { product: "SSD 1TB", available: 1, requested: 2 }
    ///      │
    ///      ▼
    /// Whole checkout rolled back, cart untouched
    /// ```
    #[error("Not enough stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A cart quantity would exceed the stock snapshot taken when the
    /// product was added.
    #[error("Stock limit reached for {code}: limit {limit}, you have {in_cart} in cart")]
    StockLimitExceeded {
        code: String,
        limit: i64,
        in_cart: i64,
    },

    /// Cart operation on a product code that is not in the cart.
    #[error("Item {0} not found in cart")]
    NotInCart(String),

    /// Quantity must be positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Checkout of an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Bank transfer without bank name / account number.
    #[error("Please provide bank details")]
    MissingBankDetails,

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format, with a human explanation.
    #[error("{reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn format(field: &str, reason: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
