//! # Checkout Commands
//!
//! Paying for the session's cart, and the sales history views.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(payment)                                                      │
//! │       │                                                                 │
//! │       ├── lock the session cart (held until the end)                    │
//! │       ▼                                                                 │
//! │  CheckoutEngine::checkout ── one transaction for every line            │
//! │       │                                                                 │
//! │       ├── failure ──► nothing written, cart untouched ──► ApiError      │
//! │       ▼                                                                 │
//! │  commit, cart cleared                                                   │
//! │       ▼                                                                 │
//! │  CheckoutResponse { receipt, receipt_text }                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ApiResult;
use crate::state::{Session, Shop};
use shop_core::{Payment, Receipt, SaleRecord};

/// A completed checkout.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub receipt: Receipt,
    /// The receipt laid out for the 40-column receipt window.
    pub receipt_text: String,
}

/// Checks out the session's cart.
pub async fn checkout(shop: &Shop, session: &Session, payment: &Payment) -> ApiResult<CheckoutResponse> {
    debug!(user_id = session.user_id(), method = %payment.method, "checkout command");

    let mut cart = session.lock_cart().await;
    let receipt = shop
        .db()
        .checkout()
        .checkout(session.user_id(), &mut cart, payment)
        .await?;
    drop(cart);

    info!(
        user_id = session.user_id(),
        receipt_number = %receipt.receipt_number,
        "Checkout complete"
    );

    let receipt_text = receipt.render(&shop.config().receipt_format());
    Ok(CheckoutResponse {
        receipt,
        receipt_text,
    })
}

/// The session user's own purchases, newest first.
pub async fn order_history(shop: &Shop, session: &Session) -> ApiResult<Vec<SaleRecord>> {
    debug!(user_id = session.user_id(), "order_history command");
    Ok(shop.db().sales().for_customer(session.user_id()).await?)
}

/// Every sale, newest first. Manager only.
pub async fn all_sales(shop: &Shop, session: &Session) -> ApiResult<Vec<SaleRecord>> {
    session.require_manager()?;
    debug!("all_sales command");
    Ok(shop.db().sales().all().await?)
}
