//! # Cart Commands
//!
//! Commands for the session's cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Receipt  │       │
//! │  │  Cart    │     │          │     │  Form    │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart        checkout                           │
//! │                   update_cart_item   (checkout.rs)                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the updated [`CartSummary`].

use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{Session, Shop};
use shop_core::cart::CartSummary;
use shop_core::CoreError;

/// Gets the current cart contents.
pub async fn get_cart(session: &Session) -> CartSummary {
    debug!("get_cart command");
    session.with_cart(|cart| CartSummary::from(cart)).await
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - The product is looked up live, so the price and stock snapshot are
///   current at the moment of adding
/// - If the product is already in the cart its quantity increases, up to
///   the stock snapshot
///
/// ## Arguments
/// * `code` - Product code
/// * `quantity` - Quantity to add (default: 1)
pub async fn add_to_cart(
    shop: &Shop,
    session: &Session,
    code: &str,
    quantity: Option<i64>,
) -> ApiResult<CartSummary> {
    let quantity = quantity.unwrap_or(1);
    debug!(code = %code, qty = quantity, "add_to_cart command");

    let product = shop
        .db()
        .products()
        .get_by_code(code.trim())
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))?;

    session
        .with_cart_mut(|cart| {
            cart.add(&product, quantity)?;
            Ok::<CartSummary, CoreError>(CartSummary::from(&*cart))
        })
        .await
        .map_err(ApiError::from)
}

/// Sets the quantity of a line already in the cart.
pub async fn update_cart_item(session: &Session, code: &str, quantity: i64) -> ApiResult<CartSummary> {
    debug!(code = %code, qty = quantity, "update_cart_item command");

    session
        .with_cart_mut(|cart| {
            cart.set_quantity(code, quantity)?;
            Ok::<CartSummary, CoreError>(CartSummary::from(&*cart))
        })
        .await
        .map_err(ApiError::from)
}

/// Removes a line from the cart. Removing a code that is not in the cart
/// leaves the cart as it is.
pub async fn remove_from_cart(session: &Session, code: &str) -> CartSummary {
    debug!(code = %code, "remove_from_cart command");

    session
        .with_cart_mut(|cart| {
            if !cart.remove(code) {
                debug!(code = %code, "Nothing to remove");
            }
            CartSummary::from(&*cart)
        })
        .await
}

/// Clears all items from the cart.
pub async fn clear_cart(session: &Session) -> CartSummary {
    debug!("clear_cart command");

    session
        .with_cart_mut(|cart| {
            cart.clear();
            CartSummary::from(&*cart)
        })
        .await
}
