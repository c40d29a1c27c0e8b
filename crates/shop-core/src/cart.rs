//! # Cart
//!
//! The per-session shopping cart.
//!
//! ## Ownership
//! A cart belongs to exactly one session and is handed to checkout by
//! reference. There is no process-wide cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Shop action              Cart method             State change          │
//! │  ───────────              ───────────             ────────────          │
//! │                                                                         │
//! │  Add to cart ────────────► add() ───────────────► push or merge qty    │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity() ──────► overwrite / remove   │
//! │                                                                         │
//! │  Remove ─────────────────► remove() ────────────► retain != code       │
//! │                                                                         │
//! │  Checkout succeeded ─────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  NOTE: stock limits use the snapshot taken when the product was added.  │
//! │        Live stock is only re-checked by checkout.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

/// One product in the cart.
///
/// Name, price and stock are frozen when the product is added, so the cart
/// shows consistent data even if the catalog changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_code: String,
    pub name: String,
    pub unit_price: Money,
    /// Always > 0.
    pub quantity: i64,
    /// Stock seen when the product was last added.
    pub max_stock: i64,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_code: product.code.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            max_stock: product.stock_qty,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - One line per product code (adding again merges quantities)
/// - Every line has quantity > 0
/// - No line exceeds its stock snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds `quantity` of a product, merging with an existing line.
    ///
    /// `product.stock_qty` is the stock snapshot the new total is checked
    /// against.
    ///
    /// ```rust
    /// use shop_core::{Cart, Money, Product};
    ///
    /// let ram = Product {
    ///     id: 1,
    ///     code: "1001".into(),
    ///     name: "Kingston 16GB DDR4".into(),
    ///     price: Money::from_major(500),
    ///     stock_qty: 3,
    ///     category: "Memory".into(),
    ///     details: None,
    ///     is_active: true,
    /// };
    /// let mut cart = Cart::new();
    /// cart.add(&ram, 2).unwrap();
    /// assert!(cart.add(&ram, 2).is_err());
    /// assert_eq!(cart.total().cents(), 100_000);
    /// ```
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<&CartLine> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        if let Some(index) = self.position(&product.code) {
            let line = &mut self.lines[index];
            let new_qty = line.quantity + quantity;
            if new_qty > product.stock_qty {
                return Err(CoreError::StockLimitExceeded {
                    code: product.code.clone(),
                    limit: product.stock_qty,
                    in_cart: line.quantity,
                });
            }
            line.quantity = new_qty;
            line.max_stock = product.stock_qty;
            return Ok(&self.lines[index]);
        }

        if quantity > product.stock_qty {
            return Err(CoreError::StockLimitExceeded {
                code: product.code.clone(),
                limit: product.stock_qty,
                in_cart: 0,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Overwrites a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, code: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove(code);
            return Ok(());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_code == code)
            .ok_or_else(|| CoreError::NotInCart(code.to_string()))?;

        if quantity > line.max_stock {
            return Err(CoreError::StockLimitExceeded {
                code: code.to_string(),
                limit: line.max_stock,
                in_cart: line.quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes the line for `code`. Returns whether a line was removed;
    /// removing an absent code is not an error.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_code != code);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, code: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_code == code)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product_code == code)
    }
}

/// Read-only cart view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummary {
    pub lines: Vec<CartSummaryLine>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartSummaryLine {
    pub product_code: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            lines: cart
                .lines()
                .iter()
                .map(|l| CartSummaryLine {
                    product_code: l.product_code.clone(),
                    name: l.name.clone(),
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                    line_total: l.line_total(),
                })
                .collect(),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(code: &str, price: i64, stock: i64) -> Product {
        Product {
            id: code.parse().unwrap_or(0),
            code: code.to_string(),
            name: format!("Product {}", code),
            price: Money::from_major(price),
            stock_qty: stock,
            category: "General".to_string(),
            details: None,
            is_active: true,
        }
    }

    fn quantities(cart: &Cart) -> Vec<(String, i64, Money)> {
        cart.lines()
            .iter()
            .map(|l| (l.product_code.clone(), l.quantity, l.line_total()))
            .collect()
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1001", 500, 10);

        let line = cart.add(&product, 2).unwrap();
        assert_eq!(line.line_total(), Money::from_major(1_000));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total(), Money::from_major(1_000));
    }

    #[test]
    fn test_merge_matches_single_add() {
        let product = test_product("1001", 500, 10);

        let mut split = Cart::new();
        split.add(&product, 3).unwrap();
        split.add(&product, 4).unwrap();

        let mut single = Cart::new();
        single.add(&product, 7).unwrap();

        assert_eq!(split.len(), 1);
        assert_eq!(quantities(&split), quantities(&single));
        assert_eq!(split.total(), Money::from_major(3_500));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1001", 500, 10);
        assert!(matches!(
            cart.add(&product, 0),
            Err(CoreError::InvalidQuantity(0))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_respects_stock_snapshot() {
        let mut cart = Cart::new();
        let product = test_product("1001", 500, 3);

        assert!(matches!(
            cart.add(&product, 4),
            Err(CoreError::StockLimitExceeded { in_cart: 0, .. })
        ));

        cart.add(&product, 2).unwrap();
        let err = cart.add(&product, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockLimitExceeded {
                limit: 3,
                in_cart: 2,
                ..
            }
        ));
        assert_eq!(cart.line("1001").map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(&test_product("1001", 500, 5), 1).unwrap();

        cart.set_quantity("1001", 5).unwrap();
        assert_eq!(cart.total(), Money::from_major(2_500));

        assert!(matches!(
            cart.set_quantity("1001", 6),
            Err(CoreError::StockLimitExceeded { limit: 5, .. })
        ));
        assert!(matches!(
            cart.set_quantity("9999", 1),
            Err(CoreError::NotInCart(_))
        ));

        cart.set_quantity("1001", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_noop_for_absent_code() {
        let mut cart = Cart::new();
        cart.add(&test_product("1001", 500, 5), 1).unwrap();
        cart.add(&test_product("1002", 250, 5), 2).unwrap();

        assert!(!cart.remove("9999"));
        assert_eq!(cart.len(), 2);
        assert!(cart.remove("1001"));
        assert_eq!(cart.total(), Money::from_major(500));
    }

    #[test]
    fn test_summary_and_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product("1001", 500, 5), 2).unwrap();
        cart.add(&test_product("1002", 250, 5), 1).unwrap();

        let summary = CartSummary::from(&cart);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.total, Money::from_major(1_250));
        assert_eq!(summary.lines[0].line_total, Money::from_major(1_000));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }
}
