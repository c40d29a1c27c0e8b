//! # Report Service
//!
//! Loads committed data and hands it to `shop_core::report` for
//! aggregation.
//!
//! Reports are read-only and must keep the dashboard usable when storage
//! misbehaves: every query that fails is logged at `warn!` and replaced by
//! an empty (or zero) result instead of an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::Database;
use shop_core::report::{
    completed_services_table, customer_activity_table, customer_breakdown, customers_table,
    orders_breakdown, orders_table, pending_services_table, products_table, revenue_breakdown,
    revenue_table, sales_table, stock_breakdown, stock_table, CategoryStock, CustomerActivity,
    CustomerKey, CustomerSpend, DashboardStats, OrdersBreakdown, ReportTable, RevenueBreakdown,
};
use shop_core::{
    CompletedService, Product, SaleRecord, Service, User, LOW_STOCK_THRESHOLD,
};

/// The exportable reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Products,
    Customers,
    Sales,
    PendingServices,
    CompletedServices,
    Revenue,
    Orders,
    Stock,
    CustomerActivity,
}

/// Knobs shared by all reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub currency_symbol: String,
    pub low_stock_threshold: i64,
    pub customer_key: CustomerKey,
    /// Keep only the top N customers; `None` keeps all.
    pub top_customers: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            currency_symbol: "₱".to_string(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            customer_key: CustomerKey::UserId,
            top_customers: None,
        }
    }
}

/// Logs a failed report query and substitutes an empty value.
fn or_empty<T: Default>(report: &str, result: DbResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(report, error = %err, "Report query failed; showing empty result");
        T::default()
    })
}

/// Read-side reporting over a [`Database`].
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    // =========================================================================
    // Loaders
    // =========================================================================

    async fn sales(&self) -> Vec<SaleRecord> {
        or_empty("sales", self.db.sales().all().await)
    }

    async fn completed(&self) -> Vec<CompletedService> {
        or_empty("completed services", self.db.services().all_completed().await)
    }

    async fn pending(&self) -> Vec<Service> {
        or_empty("pending services", self.db.services().list_pending(None).await)
    }

    async fn products(&self) -> Vec<Product> {
        or_empty("products", self.db.products().list(None, None).await)
    }

    async fn customers(&self) -> Vec<User> {
        or_empty("customers", self.db.users().list_customers().await)
    }

    // =========================================================================
    // Breakdowns
    // =========================================================================

    /// Headline numbers for the manager dashboard.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let product_sales = or_empty("sales revenue", self.db.sales().total_revenue().await);
        let services = or_empty("service revenue", self.db.services().completed_revenue().await);

        let stats = DashboardStats {
            total_revenue: product_sales + services,
            sales_count: or_empty("sales count", self.db.sales().count().await),
            total_stock: or_empty("stock", self.db.products().total_stock().await),
            customer_count: or_empty("customer count", self.db.users().count_customers().await),
        };

        debug!(
            revenue = %stats.total_revenue,
            sales = stats.sales_count,
            stock = stats.total_stock,
            customers = stats.customer_count,
            "Dashboard stats"
        );
        stats
    }

    pub async fn revenue(&self) -> RevenueBreakdown {
        revenue_breakdown(&self.sales().await, &self.completed().await)
    }

    pub async fn orders(&self) -> OrdersBreakdown {
        let sales = or_empty("sales count", self.db.sales().count().await);
        let completed = or_empty("completed count", self.db.services().completed_count().await);
        orders_breakdown(sales, completed, &self.pending().await)
    }

    pub async fn stock(&self, low_stock_threshold: i64) -> Vec<CategoryStock> {
        stock_breakdown(&self.products().await, low_stock_threshold)
    }

    /// Spend per customer across product sales and completed services,
    /// highest first.
    pub async fn customer_activity(
        &self,
        key: CustomerKey,
        limit: Option<usize>,
    ) -> Vec<CustomerActivity> {
        let sales = self.sales().await;
        let completed = self.completed().await;

        let activity = sales
            .iter()
            .map(CustomerSpend::from)
            .chain(completed.iter().map(CustomerSpend::from));

        customer_breakdown(activity, key, limit)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Builds one report as a table of display strings.
    pub async fn table(&self, kind: ReportKind, options: &ReportOptions) -> ReportTable {
        let currency = options.currency_symbol.as_str();

        debug!(kind = ?kind, "Building report table");

        match kind {
            ReportKind::Products => products_table(&self.products().await, currency),
            ReportKind::Customers => customers_table(&self.customers().await),
            ReportKind::Sales => sales_table(&self.sales().await, currency),
            ReportKind::PendingServices => pending_services_table(&self.pending().await, currency),
            ReportKind::CompletedServices => {
                completed_services_table(&self.completed().await, currency)
            }
            ReportKind::Revenue => revenue_table(&self.revenue().await, currency),
            ReportKind::Orders => orders_table(&self.orders().await),
            ReportKind::Stock => stock_table(&self.stock(options.low_stock_threshold).await),
            ReportKind::CustomerActivity => customer_activity_table(
                &self
                    .customer_activity(options.customer_key, options.top_customers)
                    .await,
                currency,
            ),
        }
    }
}
