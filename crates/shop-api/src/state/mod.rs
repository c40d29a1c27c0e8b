//! # State Module
//!
//! State the commands run against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   one per process                     │
//! │  │  Shop                        │                                       │
//! │  │  • Database (SQLite pool)    │                                       │
//! │  │  • ShopConfig                │                                       │
//! │  └──────────────────────────────┘                                       │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   one per logged-in user              │
//! │  │  Session                     │                                       │
//! │  │  • UserSession (id, role)    │                                       │
//! │  │  • Mutex<Cart>               │                                       │
//! │  └──────────────────────────────┘                                       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Shop: Database has an internal connection pool                      │
//! │  • Session: the cart lock is held across the checkout transaction      │
//! │  • Sessions never share a cart                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;
mod shop;

pub use session::Session;
pub use shop::Shop;
