//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Row Per Cart Line                             │
//! │                                                                         │
//! │  checkout(cart = [1001 × 2, 1005 × 1])                                 │
//! │       │                                                                 │
//! │       ├── sales #41  product 1001  qty 2  total 1,000.00               │
//! │       └── sales #42  product 1005  qty 1  total   350.00               │
//! │                                                                         │
//! │  Rows are written only inside the checkout transaction and never       │
//! │  updated afterwards. `full_name` is a snapshot taken at checkout.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shop_core::{Money, Payment, ProductId, Sale, SaleId, SaleRecord, UserId};

const SALE_COLUMNS: &str = "id, customer_id, full_name, product_id, quantity, \
     total_price_cents AS total_price, payment_method, bank_name, account_number, sold_at";

const SALE_RECORD_SELECT: &str = r#"
    SELECT
        s.id AS sale_id,
        s.sold_at,
        s.customer_id,
        s.full_name,
        p.name AS product_name,
        s.quantity,
        s.total_price_cents AS total_price,
        s.payment_method,
        s.bank_name
    FROM sales s
    INNER JOIN products p ON p.id = s.product_id
"#;

/// A sale line about to be written by the checkout transaction.
#[derive(Debug)]
pub(crate) struct NewSale<'a> {
    pub customer_id: UserId,
    pub full_name: &'a str,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: Money,
    pub payment: &'a Payment,
    pub sold_at: DateTime<Utc>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: SaleId) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// A customer's order history, newest first.
    pub async fn for_customer(&self, customer_id: UserId) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(&format!(
            "{SALE_RECORD_SELECT} WHERE s.customer_id = ?1 ORDER BY s.sold_at DESC, s.id DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(customer_id, count = sales.len(), "Loaded order history");
        Ok(sales)
    }

    /// Every sale, newest first (manager view).
    pub async fn all(&self) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(&format!(
            "{SALE_RECORD_SELECT} ORDER BY s.sold_at DESC, s.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sum of all product sales.
    pub async fn total_revenue(&self) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_price_cents), 0) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_cents(cents))
    }

    /// Writes one sale line on the caller's connection (normally an open
    /// transaction). Bank details are stored for bank transfers only.
    pub(crate) async fn insert(conn: &mut SqliteConnection, sale: &NewSale<'_>) -> DbResult<SaleId> {
        let bank = sale.payment.recorded_bank();

        debug!(
            customer_id = sale.customer_id,
            product_id = sale.product_id,
            qty = sale.quantity,
            total = %sale.total_price,
            "Inserting sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                customer_id, full_name, product_id, quantity, total_price_cents,
                payment_method, bank_name, account_number, sold_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(sale.customer_id)
        .bind(sale.full_name)
        .bind(sale.product_id)
        .bind(sale.quantity)
        .bind(sale.total_price)
        .bind(sale.payment.method)
        .bind(bank.map(|b| b.bank_name.as_str()))
        .bind(bank.map(|b| b.account_number.as_str()))
        .bind(sale.sold_at)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_product, insert_user, test_db};
    use chrono::Duration;
    use shop_core::{PaymentMethod, Role};

    #[tokio::test]
    async fn test_history_is_newest_first_and_scoped() {
        let db = test_db().await;
        let juan = insert_user(&db, "juan", Role::Customer, "Juan Dela Cruz").await;
        let ana = insert_user(&db, "ana", Role::Customer, "Ana Reyes").await;
        let ssd = insert_product(&db, "1001", "SSD 1TB", 10, "Storage").await;

        let cash = Payment::cash_on_pickup();
        let bank = Payment::bank_transfer("BDO", "0012-3456");
        let earlier = Utc::now() - Duration::hours(1);

        let mut conn = db.pool().acquire().await.unwrap();
        let first = SaleRepository::insert(
            &mut conn,
            &NewSale {
                customer_id: juan,
                full_name: "Juan Dela Cruz",
                product_id: ssd.id,
                quantity: 1,
                total_price: Money::from_major(100),
                payment: &cash,
                sold_at: earlier,
            },
        )
        .await
        .unwrap();
        let second = SaleRepository::insert(
            &mut conn,
            &NewSale {
                customer_id: juan,
                full_name: "Juan Dela Cruz",
                product_id: ssd.id,
                quantity: 2,
                total_price: Money::from_major(200),
                payment: &bank,
                sold_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        SaleRepository::insert(
            &mut conn,
            &NewSale {
                customer_id: ana,
                full_name: "Ana Reyes",
                product_id: ssd.id,
                quantity: 1,
                total_price: Money::from_major(100),
                payment: &cash,
                sold_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        drop(conn);

        let history = db.sales().for_customer(juan).await.unwrap();
        let ids: Vec<SaleId> = history.iter().map(|s| s.sale_id).collect();
        assert_eq!(ids, [second, first]);
        assert_eq!(history[0].product_name, "SSD 1TB");
        assert_eq!(history[0].payment_method, PaymentMethod::BankTransfer);
        assert_eq!(history[0].bank_name.as_deref(), Some("BDO"));
        assert_eq!(history[1].bank_name, None);

        assert_eq!(db.sales().all().await.unwrap().len(), 3);
        assert_eq!(db.sales().count().await.unwrap(), 3);
        assert_eq!(db.sales().total_revenue().await.unwrap(), Money::from_major(400));

        let stored = db.sales().get_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.account_number, None);
        assert_eq!(stored.total_price, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_empty_ledger_totals_are_zero() {
        let db = test_db().await;
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.sales().total_revenue().await.unwrap(), Money::zero());
        assert!(db.sales().all().await.unwrap().is_empty());
    }
}
