//! # Session State
//!
//! A logged-in user and their cart.
//!
//! The cart lives in a `tokio::sync::Mutex` so checkout can keep it locked
//! while the storage transaction runs: a second command on the same session
//! waits instead of editing a cart that is being paid for.

use tokio::sync::{Mutex, MutexGuard};

use crate::error::{ApiError, ApiResult};
use shop_core::{Cart, Role, UserId, UserSession};

#[derive(Debug)]
pub struct Session {
    user: UserSession,
    cart: Mutex<Cart>,
}

impl Session {
    pub fn new(user: UserSession) -> Self {
        Session {
            user,
            cart: Mutex::new(Cart::new()),
        }
    }

    pub fn user(&self) -> &UserSession {
        &self.user
    }

    pub fn user_id(&self) -> UserId {
        self.user.user_id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Fails with `Unauthorized` unless this is a manager session.
    pub fn require_manager(&self) -> ApiResult<()> {
        if self.user.is_manager() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Manager access required"))
        }
    }

    /// Executes a function with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub async fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().await;
        f(&mut cart)
    }

    /// Locks the cart for an operation that awaits while holding it.
    pub(crate) async fn lock_cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().await
    }
}
