//! # Commands Module
//!
//! Everything the presentation layer can ask the shop to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── auth.rs      ◄─── Login, registration, customer list
//! ├── catalog.rs   ◄─── Product browsing and maintenance
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Checkout and sales history
//! ├── services.rs  ◄─── Service bookings and the service ledger
//! └── reports.rs   ◄─── Dashboard and report export
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Presentation layer                                                     │
//! │  ──────────────────                                                     │
//! │  let session = commands::auth::login(&shop, "user", "user123").await?;  │
//! │  commands::cart::add_to_cart(&shop, &session, "1001", Some(2)).await?;  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      shop: &Shop,          ◄── shared database + config                 │
//! │      session: &Session,    ◄── this user's account and cart             │
//! │      code: &str,           ◄── request parameters                       │
//! │      quantity: Option<i64>,                                             │
//! │  ) -> ApiResult<CartSummary>                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Outcome::from(result)  ◄── optional (success, message, data) envelope  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! async fn get_cart(session: &Session)
//!
//! // Needs the database and the cart
//! async fn add_to_cart(shop: &Shop, session: &Session, ...)
//!
//! // Manager commands check the session role first
//! async fn complete_service(shop: &Shop, session: &Session, id: ServiceId)
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod reports;
pub mod services;
