//! # Catalog Commands
//!
//! Browsing is open to every session; maintenance is manager only.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shop screen                         Manager inventory screen           │
//! │  ───────────                         ────────────────────────           │
//! │  list_products(category, search)     next_product_code()                │
//! │  list_categories()                   add_product(new)                   │
//! │  get_product(code)                   restock_product(id, qty)           │
//! │                                      delete_product(id)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::{Session, Shop};
use shop_core::validation::validate_search_query;
use shop_core::{NewProduct, Product, ProductId};

/// Active products, optionally filtered.
///
/// ## Arguments
/// * `category` - `None` or `"All"` shows every category
/// * `search` - matches name or code; blank shows everything
pub async fn list_products(
    shop: &Shop,
    category: Option<&str>,
    search: Option<&str>,
) -> ApiResult<Vec<Product>> {
    let search = search.map(validate_search_query).transpose()?;
    debug!(category = ?category, search = ?search, "list_products command");

    Ok(shop.db().products().list(category, search.as_deref()).await?)
}

pub async fn list_categories(shop: &Shop) -> ApiResult<Vec<String>> {
    Ok(shop.db().products().categories().await?)
}

/// An active product by code.
pub async fn get_product(shop: &Shop, code: &str) -> ApiResult<Product> {
    debug!(code = %code, "get_product command");

    shop.db()
        .products()
        .get_by_code(code.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Product", code))
}

/// Suggested code for the add-product form.
pub async fn next_product_code(shop: &Shop, session: &Session) -> ApiResult<String> {
    session.require_manager()?;
    Ok(shop.db().products().next_code().await?)
}

pub async fn add_product(shop: &Shop, session: &Session, product: NewProduct) -> ApiResult<Product> {
    session.require_manager()?;
    debug!(code = %product.code, "add_product command");

    let product = shop.db().products().add(product).await?;
    info!(code = %product.code, by = session.user_id(), "Product added");
    Ok(product)
}

pub async fn restock_product(
    shop: &Shop,
    session: &Session,
    id: ProductId,
    quantity: i64,
) -> ApiResult<Product> {
    session.require_manager()?;
    debug!(product_id = id, qty = quantity, "restock_product command");

    Ok(shop.db().products().restock(id, quantity).await?)
}

/// Hides a product from the catalog; sale history keeps it.
pub async fn delete_product(shop: &Shop, session: &Session, id: ProductId) -> ApiResult<()> {
    session.require_manager()?;
    debug!(product_id = id, "delete_product command");

    shop.db().products().soft_delete(id).await?;
    info!(product_id = id, by = session.user_id(), "Product deleted");
    Ok(())
}
