//! # shop-core: Pure Business Logic for ShopSystem
//!
//! Everything the shop decides without touching storage lives here: money
//! math, cart rules, field validation, service pricing, receipt layout and
//! report aggregation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopSystem Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation layer (external)                     │   │
//! │  │    Login ──► Shop ──► Cart ──► Checkout ──► Services ──► Reports│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shop-api (Shop facade, Session)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shop-core (THIS CRATE) ★                        │   │
//! │  │   money · types · cart · validation · catalog · services        │   │
//! │  │   receipt · report                                              │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shop-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Sale, Service, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field and business rule validation
//! - [`catalog`] - Product code allocation and search normalisation
//! - [`cart`] - Session-scoped shopping cart
//! - [`services`] - Service price list and schedule tagging
//! - [`receipt`] - Receipt model and text rendering
//! - [`report`] - Revenue, order, stock and customer aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use shop_core::money::Money;
//!
//! let price = Money::parse("500.00").unwrap();
//! assert_eq!(price.cents(), 50_000);
//! assert_eq!((price * 3).to_string(), "1,500.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod services;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{Receipt, ReceiptFormat};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Product code handed out when the catalog has no numeric codes yet.
pub const SEED_PRODUCT_CODE: &str = "1001";

/// Category assigned to products added without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Stock level at or below which a product counts as "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Rows per page in the completed-service history.
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 10;

/// Category filter value meaning "no filter" (what the shop dropdown sends).
pub const ALL_CATEGORIES: &str = "All";
