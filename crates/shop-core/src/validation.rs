//! # Validation Module
//!
//! Input validation for registration, catalog maintenance and cart entry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer                                           │
//! │  └── Live field feedback via FieldCheck { valid, reason }              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: shop-api / shop-db                                           │
//! │  └── THIS MODULE: every write re-validates at the store boundary       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── UNIQUE (users.username, products.code)                            │
//! │  └── CHECK (stock_qty >= 0, price_cents >= 0)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shop_core::validation::{validate_registration, Registration};
//!
//! let form = Registration {
//!     username: "ab",
//!     password: "Passw0rd",
//!     full_name: "Jo",
//!     email: "jo@gmail.com",
//!     phone: "09123456789",
//! };
//! let err = validate_registration(&form).unwrap_err();
//! assert_eq!(err.to_string(), "Username must be at least 3 characters long");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;
const FULL_NAME_MIN: usize = 2;
const PRODUCT_CODE_MAX: usize = 50;
const PRODUCT_NAME_MAX: usize = 200;
const SEARCH_MAX: usize = 100;
const GMAIL_DOMAIN: &str = "@gmail.com";

// =============================================================================
// Field Check
// =============================================================================

/// `(valid, reason)` view of a validation result, for live form feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldCheck {
    pub valid: bool,
    pub reason: String,
}

impl FieldCheck {
    pub fn ok() -> Self {
        FieldCheck {
            valid: true,
            reason: "Valid".to_string(),
        }
    }
}

impl From<ValidationResult<()>> for FieldCheck {
    fn from(result: ValidationResult<()>) -> Self {
        match result {
            Ok(()) => FieldCheck::ok(),
            Err(err) => FieldCheck {
                valid: false,
                reason: err.to_string(),
            },
        }
    }
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - 3 to 20 characters
/// - Starts with a letter
/// - Letters, digits and underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    const FIELD: &str = "Username";

    if username.is_empty() {
        return Err(ValidationError::required(FIELD));
    }
    let len = username.chars().count();
    if len < USERNAME_MIN {
        return Err(ValidationError::TooShort {
            field: FIELD.to_string(),
            min: USERNAME_MIN,
        });
    }
    if len > USERNAME_MAX {
        return Err(ValidationError::TooLong {
            field: FIELD.to_string(),
            max: USERNAME_MAX,
        });
    }
    if !username.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(ValidationError::format(
            FIELD,
            "Username must start with a letter",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::format(
            FIELD,
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Validates password strength.
///
/// ## Rules
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter and one digit
pub fn validate_password(password: &str) -> ValidationResult<()> {
    const FIELD: &str = "Password";

    if password.is_empty() {
        return Err(ValidationError::required(FIELD));
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: FIELD.to_string(),
            min: PASSWORD_MIN,
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::format(
            FIELD,
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::format(
            FIELD,
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::format(
            FIELD,
            "Password must contain at least one number",
        ));
    }

    Ok(())
}

/// Validates a display name: letters, whitespace, `-`, `'` and `.`.
pub fn validate_full_name(full_name: &str) -> ValidationResult<()> {
    const FIELD: &str = "Full name";

    let name = full_name.trim();
    if name.is_empty() {
        return Err(ValidationError::required(FIELD));
    }
    if name.chars().count() < FULL_NAME_MIN {
        return Err(ValidationError::TooShort {
            field: FIELD.to_string(),
            min: FULL_NAME_MIN,
        });
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.'))
    {
        return Err(ValidationError::format(
            FIELD,
            "Full name can only contain letters, spaces, hyphens, and apostrophes",
        ));
    }

    Ok(())
}

/// Validates a Gmail address.
///
/// ```rust
/// use shop_core::validation::validate_email;
///
/// assert!(validate_email("juan.dc+shop@GMAIL.com").is_ok());
/// assert!(validate_email("juan@yahoo.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    const FIELD: &str = "Email";

    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required(FIELD));
    }

    let lower = email.to_ascii_lowercase();
    if !lower.ends_with(GMAIL_DOMAIN) {
        return Err(ValidationError::format(
            FIELD,
            "Email must be a Gmail address (@gmail.com)",
        ));
    }

    let local = &email[..email.len() - GMAIL_DOMAIN.len()];
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return Err(ValidationError::format(
            FIELD,
            "Invalid email format (example: user@gmail.com)",
        ));
    }

    Ok(())
}

/// Validates a Philippine mobile number (`09XXXXXXXXX`); spaces and dashes
/// are ignored.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    const FIELD: &str = "Phone number";

    if phone.trim().is_empty() {
        return Err(ValidationError::required(FIELD));
    }

    let digits = normalize_phone(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::format(
            FIELD,
            "Phone number must contain only numbers",
        ));
    }
    if digits.len() != 11 {
        return Err(ValidationError::format(
            FIELD,
            "Phone number must be exactly 11 digits",
        ));
    }
    if !digits.starts_with("09") {
        return Err(ValidationError::format(
            FIELD,
            "Philippine mobile number must start with 09",
        ));
    }

    Ok(())
}

/// Strips the spaces and dashes people type into phone numbers.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// A registration form as typed by the user.
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

/// Runs every account validator, returning the first failure.
pub fn validate_registration(form: &Registration<'_>) -> ValidationResult<()> {
    validate_username(form.username)?;
    validate_password(form.password)?;
    validate_full_name(form.full_name)?;
    validate_email(form.email)?;
    validate_phone(form.phone)?;
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Not empty, at most 50 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    const FIELD: &str = "Product code";

    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::required(FIELD));
    }
    if code.len() > PRODUCT_CODE_MAX {
        return Err(ValidationError::TooLong {
            field: FIELD.to_string(),
            max: PRODUCT_CODE_MAX,
        });
    }
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::format(
            FIELD,
            "Product code can only contain letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    const FIELD: &str = "Product name";

    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::required(FIELD));
    }
    if name.chars().count() > PRODUCT_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: FIELD.to_string(),
            max: PRODUCT_NAME_MAX,
        });
    }

    Ok(())
}

/// Catalog prices must be strictly positive.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Price".to_string(),
        });
    }
    Ok(())
}

pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "Stock".to_string(),
        });
    }
    Ok(())
}

/// Restock and cart quantities must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a search query, returning it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    if query.chars().count() > SEARCH_MAX {
        return Err(ValidationError::TooLong {
            field: "Search".to_string(),
            max: SEARCH_MAX,
        });
    }
    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("juan_23").is_ok());
        assert!(validate_username("abc").is_ok());

        assert_eq!(
            validate_username("").unwrap_err().to_string(),
            "Username is required"
        );
        assert_eq!(
            validate_username("ab").unwrap_err().to_string(),
            "Username must be at least 3 characters long"
        );
        assert_eq!(
            validate_username(&"a".repeat(21)).unwrap_err().to_string(),
            "Username must not exceed 20 characters"
        );
        assert_eq!(
            validate_username("1abc").unwrap_err().to_string(),
            "Username must start with a letter"
        );
        assert!(validate_username("juan dc").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Passw0rd").is_ok());
        assert!(validate_password("Pa0").is_err());
        assert_eq!(
            validate_password("password1").unwrap_err().to_string(),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            validate_password("PASSWORD1").unwrap_err().to_string(),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            validate_password("Password").unwrap_err().to_string(),
            "Password must contain at least one number"
        );
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Juan Dela Cruz").is_ok());
        assert!(validate_full_name("Ma. Clara O'Neil-Santos").is_ok());
        assert!(validate_full_name(" J ").is_err());
        assert!(validate_full_name("R2D2").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jo@gmail.com").is_ok());
        assert!(validate_email("Jo.Smith@Gmail.Com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("jo@yahoo.com").is_err());
        assert!(validate_email("@gmail.com").is_err());
        assert!(validate_email("jo smith@gmail.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("09123456789").is_ok());
        assert!(validate_phone("0912-345-6789").is_ok());
        assert!(validate_phone("0912 345 6789").is_ok());
        assert_eq!(
            validate_phone("0912345678").unwrap_err().to_string(),
            "Phone number must be exactly 11 digits"
        );
        assert_eq!(
            validate_phone("19123456789").unwrap_err().to_string(),
            "Philippine mobile number must start with 09"
        );
        assert!(validate_phone("09abc456789").is_err());
    }

    #[test]
    fn test_registration_reports_first_failure() {
        let form = Registration {
            username: "juan",
            password: "weak",
            full_name: "",
            email: "nope",
            phone: "1",
        };
        let err = validate_registration(&form).unwrap_err();
        assert_eq!(err.field(), "Password");
    }

    #[test]
    fn test_field_check_adapter() {
        assert_eq!(FieldCheck::from(validate_username("juan")), FieldCheck::ok());
        let check = FieldCheck::from(validate_username("ab"));
        assert!(!check.valid);
        assert_eq!(check.reason, "Username must be at least 3 characters long");
    }

    #[test]
    fn test_catalog_validators() {
        assert!(validate_product_code("1001").is_ok());
        assert!(validate_product_code("GPU-RTX_4060").is_ok());
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"9".repeat(51)).is_err());

        assert!(validate_product_name("Kingston 16GB DDR4").is_ok());
        assert!(validate_product_name("  ").is_err());

        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ssd ").unwrap(), "ssd");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
