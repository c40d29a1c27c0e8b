//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Filtered listing (category + substring search on name or code)
//! - Adding products, with the UNIQUE code constraint as the duplicate check
//! - Restock and soft delete
//!
//! ## Listing Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(Some("Storage"), Some("ssd"))                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  is_active = 1                                                         │
//! │  AND category = 'Storage'            ("All" / None → no filter)        │
//! │  AND (name LIKE '%ssd%' OR code LIKE '%ssd%')   (case-insensitive)     │
//! │  ORDER BY code                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult, StoreResult};
use shop_core::catalog::{
    category_filter, like_pattern, next_product_code, normalize_category, search_filter,
};
use shop_core::validation::{
    validate_price, validate_product_code, validate_product_name, validate_quantity,
    validate_stock,
};
use shop_core::{NewProduct, Product, ProductId};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, code, name, price_cents AS price, stock_qty, category, details, is_active";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let storage = repo.list(Some("Storage"), None).await?;
/// let ssd = repo.get_by_code("1001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists active products, ordered by code.
    ///
    /// ## Arguments
    /// * `category` - exact category; `None`, blank or `"All"` disables it
    /// * `search` - substring of name or code; `None` or blank disables it
    pub async fn list(&self, category: Option<&str>, search: Option<&str>) -> DbResult<Vec<Product>> {
        let category = category_filter(category);
        let pattern = search_filter(search).map(|term| like_pattern(&term));

        debug!(category = ?category, search = ?pattern, "Listing products");

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = 1
              AND (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR name LIKE ?2 ESCAPE '\' OR code LIKE ?2 ESCAPE '\')
            ORDER BY code
            "#
        ))
        .bind(category)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Distinct categories of active products, sorted.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM products WHERE is_active = 1 ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets an active product by code.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - no such code, or soft-deleted
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1 AND is_active = 1"
        ))
        .bind(code.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by id, including soft-deleted ones.
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Every code ever issued, soft-deleted products included.
    pub async fn all_codes(&self) -> DbResult<Vec<String>> {
        let codes: Vec<String> = sqlx::query_scalar("SELECT code FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(codes)
    }

    /// Suggests the next numeric product code.
    ///
    /// Not reserved: two managers asking at the same time get the same
    /// answer, and the second `add` then fails on the UNIQUE code.
    pub async fn next_code(&self) -> DbResult<String> {
        let codes = self.all_codes().await?;
        Ok(next_product_code(codes))
    }

    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Units on hand across active products.
    pub async fn total_stock(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(stock_qty), 0) FROM products WHERE is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the catalog.
    ///
    /// ## Returns
    /// * `Err(StoreError::Rejected)` - invalid code, name, price or stock
    /// * `Err(StoreError::Storage(DbError::UniqueViolation))` - code taken
    pub async fn add(&self, product: NewProduct) -> StoreResult<Product> {
        let code = product.code.trim().to_string();
        let name = product.name.trim().to_string();

        validate_product_code(&code)?;
        validate_product_name(&name)?;
        validate_price(product.price)?;
        validate_stock(product.stock_qty)?;

        let category = normalize_category(&product.category);
        let details = product
            .details
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let now = Utc::now();

        debug!(code = %code, name = %name, category = %category, "Adding product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (code, name, price_cents, stock_qty, category, details, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
        )
        .bind(&code)
        .bind(&name)
        .bind(product.price)
        .bind(product.stock_qty)
        .bind(&category)
        .bind(&details)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("code", &code))?;

        info!(code = %code, "Product added");

        Ok(Product {
            id: result.last_insert_rowid(),
            code,
            name,
            price: product.price,
            stock_qty: product.stock_qty,
            category,
            details,
            is_active: true,
        })
    }

    /// Adds `quantity` units to an active product's stock.
    ///
    /// The increment happens in SQL, so concurrent restocks and checkouts
    /// never overwrite each other.
    pub async fn restock(&self, id: ProductId, quantity: i64) -> StoreResult<Product> {
        validate_quantity(quantity)?;

        debug!(product_id = id, qty = quantity, "Restocking product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_qty = stock_qty + ?1, updated_at = ?2
            WHERE id = ?3 AND is_active = 1
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id).into());
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id).into())
    }

    /// Hides a product from the catalog. Sale history keeps referencing it.
    ///
    /// Idempotent: deleting a missing or already-deleted id succeeds.
    pub async fn soft_delete(&self, id: ProductId) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?1 WHERE id = ?2 AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(product_id = id, changed = result.rows_affected(), "Soft-deleted product");
        Ok(())
    }
}
