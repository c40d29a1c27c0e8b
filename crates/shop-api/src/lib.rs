//! # shop-api: Session Facade for ShopSystem
//!
//! The boundary between the presentation layer and the shop core.
//!
//! ## Module Organization
//! ```text
//! shop_api/
//! ├── lib.rs          ◄─── You are here (startup & tracing)
//! ├── config.rs       ◄─── Environment configuration
//! ├── error.rs        ◄─── ApiError / ErrorCode for commands
//! ├── response.rs     ◄─── (success, message, data) envelope
//! ├── state/
//! │   ├── shop.rs     ◄─── Database + config
//! │   └── session.rs  ◄─── Logged-in user + cart
//! └── commands/
//!     ├── auth.rs     ◄─── Login, registration
//!     ├── catalog.rs  ◄─── Products
//!     ├── cart.rs     ◄─── Cart manipulation
//!     ├── checkout.rs ◄─── Checkout, sales history
//!     ├── services.rs ◄─── Service bookings and ledger
//!     └── reports.rs  ◄─── Dashboard and export
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use shop_api::{commands, init_tracing, Shop, ShopConfig};
//! use shop_core::Payment;
//!
//! init_tracing();
//! let shop = Shop::open(ShopConfig::load()?).await?;
//!
//! let session = commands::auth::login(&shop, "user", "user123").await?;
//! commands::cart::add_to_cart(&shop, &session, "1001", Some(2)).await?;
//! let done = commands::checkout::checkout(&shop, &session, &Payment::cash_on_pickup()).await?;
//! println!("{}", done.receipt_text);
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod response;
pub mod state;

pub use config::{ConfigError, ShopConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use response::Outcome;
pub use state::{Session, Shop};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shop_db=trace` - Trace the database crate only
/// - Default: INFO, DEBUG for the shop crates, WARN for sqlx
///
/// Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shop=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
