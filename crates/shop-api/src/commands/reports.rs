//! # Report Commands
//!
//! Manager dashboard and report export. All manager only.
//!
//! These never fail on storage errors: the report service substitutes
//! empty data and logs the cause. The only error is `Unauthorized`.

use tracing::debug;

use crate::error::ApiResult;
use crate::state::{Session, Shop};
use shop_core::report::{
    CategoryStock, CustomerActivity, DashboardStats, OrdersBreakdown, ReportTable,
    RevenueBreakdown,
};
use shop_db::ReportKind;

pub async fn dashboard(shop: &Shop, session: &Session) -> ApiResult<DashboardStats> {
    session.require_manager()?;
    Ok(shop.db().reports().dashboard_stats().await)
}

pub async fn revenue(shop: &Shop, session: &Session) -> ApiResult<RevenueBreakdown> {
    session.require_manager()?;
    Ok(shop.db().reports().revenue().await)
}

pub async fn orders(shop: &Shop, session: &Session) -> ApiResult<OrdersBreakdown> {
    session.require_manager()?;
    Ok(shop.db().reports().orders().await)
}

/// Stock per category, using the configured low-stock threshold.
pub async fn stock(shop: &Shop, session: &Session) -> ApiResult<Vec<CategoryStock>> {
    session.require_manager()?;
    Ok(shop
        .db()
        .reports()
        .stock(shop.config().low_stock_threshold)
        .await)
}

/// Customers by total spend, highest first.
pub async fn customer_activity(
    shop: &Shop,
    session: &Session,
    limit: Option<usize>,
) -> ApiResult<Vec<CustomerActivity>> {
    session.require_manager()?;
    Ok(shop
        .db()
        .reports()
        .customer_activity(shop.config().customer_report_key, limit)
        .await)
}

/// One report as headers and rows, ready for a document renderer.
pub async fn export_report(shop: &Shop, session: &Session, kind: ReportKind) -> ApiResult<ReportTable> {
    session.require_manager()?;
    debug!(kind = ?kind, "export_report command");

    let options = shop.config().report_options();
    Ok(shop.db().reports().table(kind, &options).await)
}
