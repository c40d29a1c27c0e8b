//! # shop-db: Database Layer for ShopSystem
//!
//! SQLite persistence for the shop, through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopSystem Data Flow                             │
//! │                                                                         │
//! │  Shop facade (shop-api)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shop-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌────────────────┐  ┌──────────────────┐  │   │
//! │  │   │   Database    │  │  Repositories  │  │  Transactions    │  │   │
//! │  │   │   (pool.rs)   │  │                │  │                  │  │   │
//! │  │   │               │  │ UserRepo       │  │ CheckoutEngine   │  │   │
//! │  │   │ SqlitePool    │◄─│ ProductRepo    │  │ ServiceRepo::    │  │   │
//! │  │   │ WAL, FKs,     │  │ SaleRepo       │  │   complete       │  │   │
//! │  │   │ busy_timeout  │  │ ServiceRepo    │  │                  │  │   │
//! │  │   └───────────────┘  └────────────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   CredentialStore (argon2)      ReportService (read-only)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (shop.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`checkout`] - The checkout transaction
//! - [`credentials`] - Registration, login, password hashing
//! - [`reports`] - Dashboard numbers and report tables
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./shop.db")).await?;
//!
//! let session = db.credentials().authenticate("user", "user123").await?;
//! let products = db.products().list(Some("Storage"), None).await?;
//! let receipt = db.checkout().checkout(session.user_id, &mut cart, &payment).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod credentials;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutEngine, CheckoutError};
pub use credentials::{AuthError, CredentialStore};
pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use reports::{ReportKind, ReportOptions, ReportService};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::service::ServiceRepository;
pub use repository::user::{NewUser, UserRepository};

// =============================================================================
// Test Helpers
// =============================================================================
