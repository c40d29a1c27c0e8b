//! # Repository Module
//!
//! Database repository implementations for ShopSystem.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Shop facade (shop-api)                                                │
//! │       │                                                                 │
//! │       │  db.products().list(Some("Storage"), Some("ssd"))              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list / categories / get_by_code                                   │
//! │  ├── add (UNIQUE code → DbError::UniqueViolation)                      │
//! │  └── restock / soft_delete                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Multi-row writes that must be atomic (checkout, service completion)   │
//! │  open their own transaction; repositories never hold one across calls. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and credential rows
//! - [`ProductRepository`](product::ProductRepository) - Catalog
//! - [`SaleRepository`](sale::SaleRepository) - Order history
//! - [`ServiceRepository`](service::ServiceRepository) - Service ledger

pub mod product;
pub mod sale;
pub mod service;
pub mod user;
