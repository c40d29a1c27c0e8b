//! # Credential Store
//!
//! Registration and login on top of [`UserRepository`].
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  authenticate("juan", "Passw0rd!")                                     │
//! │       │                                                                 │
//! │       ├── blank username / password ──────────► InvalidCredentials     │
//! │       ▼                                                                 │
//! │  users.find_credentials("juan")                                        │
//! │       ├── no row ──► dummy verify ────────────► InvalidCredentials     │
//! │       ▼                                                                 │
//! │  argon2 verify (constant time)                                         │
//! │       ├── mismatch ───────────────────────────► InvalidCredentials     │
//! │       ▼                                                                 │
//! │  UserSession { user_id, username, full_name, role }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown usernames and wrong passwords produce the same error, and both
//! pay for one argon2 verification so response time does not reveal which
//! usernames exist.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::user::{NewUser, UserRepository};
use shop_core::validation::{normalize_phone, validate_registration, Registration};
use shop_core::{Role, UserId, UserSession, ValidationError};

/// Accounts every fresh database gets:
/// `(username, password, role, full name, email, phone)`.
///
/// They predate the password policy and are inserted without validation.
pub const DEFAULT_ACCOUNTS: &[(&str, &str, Role, &str, &str, &str)] = &[
    (
        "manager",
        "admin123",
        Role::Manager,
        "Store Manager",
        "admin@melcom.com",
        "09123456789",
    ),
    (
        "user",
        "user123",
        Role::Customer,
        "Juan Dela Cruz",
        "juan@email.com",
        "09187654321",
    ),
];

/// Verified against on the unknown-username path. `None` only if hashing
/// itself is broken.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-account-password").ok());

// =============================================================================
// Errors
// =============================================================================

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password; deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    DuplicateUsername,

    /// A registration field failed validation.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    Storage(DbError),

    #[error("Password hashing failed")]
    Hashing,
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { .. } => AuthError::DuplicateUsername,
            other => AuthError::Storage(other),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with Argon2id and a random salt (PHC string format).
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Checks a password against a stored PHC hash. Unparseable hashes never
/// match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Spends one argon2 verification on a hash no password matches.
fn verify_against_dummy(password: &str) -> bool {
    match DUMMY_HASH.as_deref() {
        Some(hash) => verify_password(password, hash),
        None => false,
    }
}

// =============================================================================
// Credential Store
// =============================================================================

/// Registration and authentication of shop accounts.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: UserRepository,
}

impl CredentialStore {
    pub fn new(users: UserRepository) -> Self {
        CredentialStore { users }
    }

    /// Registers a customer account.
    ///
    /// Every field is validated before storage is touched. The UNIQUE
    /// username constraint decides duplicates.
    pub async fn register(&self, form: &Registration<'_>) -> AuthResult<UserId> {
        validate_registration(form)?;

        let user = NewUser {
            username: form.username.to_string(),
            password_hash: hash_password(form.password)?,
            role: Role::Customer,
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: normalize_phone(form.phone),
        };

        let id = self.users.insert(&user).await?;
        info!(user_id = id, username = %user.username, "Customer registered");
        Ok(id)
    }

    /// Logs a user in.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<UserSession> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some((user, hash)) = self.users.find_credentials(username).await? else {
            verify_against_dummy(password);
            debug!(username = %username, "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &hash) {
            debug!(username = %username, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, role = ?user.role, "User logged in");
        Ok(UserSession::from(user))
    }

    /// Creates any missing [`DEFAULT_ACCOUNTS`]. Returns how many were
    /// created; running it again creates none.
    pub async fn ensure_default_accounts(&self) -> AuthResult<usize> {
        let mut created = 0;

        for &(username, password, role, full_name, email, phone) in DEFAULT_ACCOUNTS {
            if self.users.exists(username).await? {
                continue;
            }

            let user = NewUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                role,
                full_name: full_name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
            };

            match self.users.insert(&user).await {
                Ok(id) => {
                    info!(user_id = id, username, "Default account created");
                    created += 1;
                }
                // another process created it between the check and the insert
                Err(DbError::UniqueViolation { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    fn form<'a>(username: &'a str, password: &'a str) -> Registration<'a> {
        Registration {
            username,
            password,
            full_name: "Jo Santos",
            email: "jo@gmail.com",
            phone: "0912-345-6789",
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Passw0rd").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Passw0rd", &hash));
        assert!(!verify_password("passw0rd", &hash));
        assert!(!verify_password("Passw0rd", "not-a-hash"));

        let again = hash_password("Passw0rd").unwrap();
        assert_ne!(hash, again);
    }

    #[test]
    fn test_dummy_hash_is_real_and_never_matches() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(hash).is_ok());
        assert!(hash.starts_with("$argon2id$"));

        assert!(!verify_against_dummy("Passw0rd"));
        assert!(!verify_against_dummy(""));
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let db = test_db().await;
        let store = db.credentials();

        let id = store.register(&form("jo_santos", "Passw0rd")).await.unwrap();
        let session = store.authenticate("jo_santos", "Passw0rd").await.unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.full_name, "Jo Santos");
        assert_eq!(session.role, Role::Customer);

        let user = db.users().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.phone, "09123456789");
    }

    #[tokio::test]
    async fn test_short_username_is_rejected_before_insert() {
        let db = test_db().await;

        let err = db
            .credentials()
            .register(&form("ab", "Passw0rd"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected(ValidationError::TooShort { .. })));
        assert!(!db.users().exists("ab").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = test_db().await;
        let store = db.credentials();
        store.register(&form("jo_santos", "Passw0rd")).await.unwrap();

        let err = store.register(&form("jo_santos", "An0therPass")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_bad_logins_look_the_same() {
        let db = test_db().await;
        let store = db.credentials();
        store.register(&form("jo_santos", "Passw0rd")).await.unwrap();

        let wrong_password = store.authenticate("jo_santos", "nope").await.unwrap_err();
        let unknown_user = store.authenticate("nobody", "Passw0rd").await.unwrap_err();
        let blank = store.authenticate("  ", "").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(blank, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_default_accounts_are_created_once() {
        let db = test_db().await;
        let store = db.credentials();

        assert_eq!(store.ensure_default_accounts().await.unwrap(), 2);
        assert_eq!(store.ensure_default_accounts().await.unwrap(), 0);

        let manager = store.authenticate("manager", "admin123").await.unwrap();
        assert!(manager.is_manager());
        assert_eq!(manager.full_name, "Store Manager");

        let customer = store.authenticate("user", "user123").await.unwrap();
        assert!(!customer.is_manager());
        assert_eq!(customer.full_name, "Juan Dela Cruz");
    }
}
