//! # Checkout Engine
//!
//! Turns a session's cart into sale rows in one transaction.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(user, cart, payment)                   │
//! │                                                                         │
//! │  cart empty? ─────────────────────────────► EmptyCart                  │
//! │  bank transfer without details? ──────────► MissingBankDetails         │
//! │  resolve user (full name snapshot) ───────► NotFound                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  for each line, in cart order:                                         │
//! │     UPDATE products SET stock_qty = stock_qty - q                      │
//! │       WHERE code = ? AND is_active = 1 AND stock_qty >= q              │
//! │       ├── 0 rows: re-read product                                      │
//! │       │     ├── missing / inactive ──► ProductNotFound   ┐             │
//! │       │     └── too little stock ────► InsufficientStock ├► ROLLBACK   │
//! │       └── 1 row: INSERT INTO sales (...)                 ┘             │
//! │  COMMIT                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clear cart, build Receipt                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Stock Can't Go Negative
//! The guarded UPDATE is the first write of the transaction and takes the
//! SQLite write lock. A second checkout blocks on that lock (up to
//! `busy_timeout`) and then sees the first one's committed stock, so the
//! `stock_qty >= q` guard is always evaluated against live data.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, StoreError};
use crate::repository::sale::{NewSale, SaleRepository};
use shop_core::receipt::ReceiptLine;
use shop_core::{Cart, CartLine, CoreError, Payment, Receipt, SaleId, UserId};

/// Checkout failure: a rejected cart/payment or a storage failure. Either
/// way nothing was committed and the cart is unchanged.
pub type CheckoutError = StoreError;

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: i64,
    name: String,
    stock_qty: i64,
    is_active: bool,
}

/// Runs checkouts against the shared pool.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Checks out every line of `cart` for `user_id`.
    ///
    /// On success the cart is cleared and the receipt returned. On failure
    /// the transaction is rolled back and the cart is left as it was.
    pub async fn checkout(
        &self,
        user_id: UserId,
        cart: &mut Cart,
        payment: &Payment,
    ) -> CheckoutResult<Receipt> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        payment.validate()?;

        let full_name: String = sqlx::query_scalar("SELECT full_name FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", user_id))?;

        debug!(
            user_id,
            lines = cart.len(),
            total = %cart.total(),
            method = %payment.method,
            "Starting checkout"
        );

        let issued_at = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let written =
            write_lines(&mut *tx, user_id, &full_name, cart.lines(), payment, issued_at).await;
        let (lines, sale_ids) = match written {
            Ok(written) => written,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Checkout rollback failed");
                }
                debug!(user_id, error = %err, "Checkout rolled back");
                return Err(err);
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let receipt = Receipt::new(full_name, payment, lines, sale_ids, issued_at);
        cart.clear();

        info!(
            user_id,
            receipt_number = %receipt.receipt_number,
            total = %receipt.grand_total,
            items = receipt.item_count(),
            "Checkout committed"
        );

        Ok(receipt)
    }
}

/// Decrements stock and writes one sale per line on the open transaction.
async fn write_lines(
    conn: &mut SqliteConnection,
    user_id: UserId,
    full_name: &str,
    lines: &[CartLine],
    payment: &Payment,
    sold_at: DateTime<Utc>,
) -> CheckoutResult<(Vec<ReceiptLine>, Vec<SaleId>)> {
    let mut receipt_lines = Vec::with_capacity(lines.len());
    let mut sale_ids = Vec::with_capacity(lines.len());

    for line in lines {
        if line.quantity <= 0 {
            return Err(CoreError::InvalidQuantity(line.quantity).into());
        }

        let updated = sqlx::query(
            r#"
            UPDATE products
            SET stock_qty = stock_qty - ?1, updated_at = ?2
            WHERE code = ?3 AND is_active = 1 AND stock_qty >= ?1
            "#,
        )
        .bind(line.quantity)
        .bind(sold_at)
        .bind(&line.product_code)
        .execute(&mut *conn)
        .await?;

        let product = sqlx::query_as::<_, StockRow>(
            "SELECT id, name, stock_qty, is_active FROM products WHERE code = ?1",
        )
        .bind(&line.product_code)
        .fetch_optional(&mut *conn)
        .await?;

        let product = match product {
            Some(product) if updated.rows_affected() > 0 => product,
            Some(product) if product.is_active => {
                return Err(CoreError::InsufficientStock {
                    product: product.name,
                    available: product.stock_qty,
                    requested: line.quantity,
                }
                .into());
            }
            _ => return Err(CoreError::ProductNotFound(line.product_code.clone()).into()),
        };

        let line_total = line.line_total();
        let sale_id = SaleRepository::insert(
            conn,
            &NewSale {
                customer_id: user_id,
                full_name,
                product_id: product.id,
                quantity: line.quantity,
                total_price: line_total,
                payment,
                sold_at,
            },
        )
        .await?;

        debug!(
            code = %line.product_code,
            qty = line.quantity,
            stock_left = product.stock_qty,
            sale_id,
            "Checkout line written"
        );

        sale_ids.push(sale_id);
        receipt_lines.push(ReceiptLine {
            product_code: line.product_code.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total,
        });
    }

    Ok((receipt_lines, sale_ids))
}
