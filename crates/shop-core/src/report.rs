//! # Reporting & Aggregation
//!
//! Read-side aggregation over committed sales, services and catalog rows,
//! plus the tabular export model handed to whatever renders documents.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shop-db ReportService                 shop-core::report (THIS FILE)   │
//! │  ─────────────────────                 ─────────────────────────────   │
//! │  all sales ─────────────┐                                               │
//! │  completed services ────┼──────────► revenue / orders / customers      │
//! │  pending services ──────┘                                               │
//! │  active products ──────────────────► stock by category                 │
//! │                                                                         │
//! │  every breakdown ──────────────────► ReportTable { title, headers,     │
//! │                                                   rows } ──► JSON      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    CompletedService, Product, SaleRecord, Service, ServiceStatus, User, UserId,
};

const SERVICE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers on the manager dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    /// Product sales plus completed services.
    pub total_revenue: Money,
    pub sales_count: i64,
    /// Units in stock across active products.
    pub total_stock: i64,
    pub customer_count: i64,
}

// =============================================================================
// Revenue & Orders
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenueBreakdown {
    pub product_sales: Money,
    pub services: Money,
}

impl RevenueBreakdown {
    pub fn total(&self) -> Money {
        self.product_sales + self.services
    }

    /// `(source, amount)` pairs as labelled on the dashboard.
    pub fn entries(&self) -> [(&'static str, Money); 2] {
        [("Product Sales", self.product_sales), ("Services", self.services)]
    }
}

pub fn revenue_breakdown(sales: &[SaleRecord], completed: &[CompletedService]) -> RevenueBreakdown {
    RevenueBreakdown {
        product_sales: sales.iter().map(|s| s.total_price).sum(),
        services: completed.iter().map(|c| c.price).sum(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrdersBreakdown {
    pub product_sales: i64,
    pub completed_services: i64,
    /// Services in the pending table whose status is not `Completed`.
    pub pending_services: i64,
}

impl OrdersBreakdown {
    pub fn total(&self) -> i64 {
        self.product_sales + self.completed_services + self.pending_services
    }

    pub fn entries(&self) -> [(&'static str, i64); 3] {
        [
            ("Product Sales", self.product_sales),
            ("Completed Services", self.completed_services),
            ("Pending Services", self.pending_services),
        ]
    }
}

/// Counts orders of each kind. `pending` rows still marked completed are
/// not counted twice.
pub fn orders_breakdown(sales_count: i64, completed_count: i64, pending: &[Service]) -> OrdersBreakdown {
    OrdersBreakdown {
        product_sales: sales_count,
        completed_services: completed_count,
        pending_services: pending
            .iter()
            .filter(|s| s.status != ServiceStatus::Completed)
            .count() as i64,
    }
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryStock {
    pub category: String,
    pub item_count: i64,
    pub total_stock: i64,
    /// Items at or below the low-stock threshold.
    pub low_stock_count: i64,
}

/// Per-category stock summary, ordered by category name.
pub fn stock_breakdown(products: &[Product], low_stock_threshold: i64) -> Vec<CategoryStock> {
    let mut by_category: BTreeMap<&str, CategoryStock> = BTreeMap::new();

    for product in products {
        let entry = by_category
            .entry(product.category.as_str())
            .or_insert_with(|| CategoryStock {
                category: product.category.clone(),
                item_count: 0,
                total_stock: 0,
                low_stock_count: 0,
            });
        entry.item_count += 1;
        entry.total_stock += product.stock_qty;
        if product.is_low_stock(low_stock_threshold) {
            entry.low_stock_count += 1;
        }
    }

    by_category.into_values().collect()
}

// =============================================================================
// Customers
// =============================================================================

/// How the customer breakdown groups activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKey {
    /// One entry per account. Two customers sharing a name stay separate.
    #[default]
    UserId,
    /// One entry per snapshot name, matching reports from older versions.
    FullName,
}

impl FromStr for CustomerKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user_id" | "id" => Ok(CustomerKey::UserId),
            "full_name" | "name" => Ok(CustomerKey::FullName),
            _ => Err(ValidationError::format(
                "Customer report key",
                "Customer report key must be user_id or full_name",
            )),
        }
    }
}

/// One purchase-like event attributed to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSpend {
    pub customer_id: UserId,
    pub full_name: String,
    pub amount: Money,
    pub at: DateTime<Utc>,
}

impl From<&SaleRecord> for CustomerSpend {
    fn from(sale: &SaleRecord) -> Self {
        CustomerSpend {
            customer_id: sale.customer_id,
            full_name: sale.full_name.clone(),
            amount: sale.total_price,
            at: sale.sold_at,
        }
    }
}

impl From<&CompletedService> for CustomerSpend {
    fn from(service: &CompletedService) -> Self {
        CustomerSpend {
            customer_id: service.customer_id,
            full_name: service.full_name.clone(),
            amount: service.price,
            at: service.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerActivity {
    /// Set when grouped by account.
    pub customer_id: Option<UserId>,
    pub name: String,
    pub order_count: i64,
    pub total_spent: Money,
}

/// Groups spend per customer, highest spender first.
///
/// Ties are ordered by name. When grouped by account, the name shown is the
/// most recent snapshot seen for that account.
pub fn customer_breakdown<I>(
    activity: I,
    key: CustomerKey,
    limit: Option<usize>,
) -> Vec<CustomerActivity>
where
    I: IntoIterator<Item = CustomerSpend>,
{
    struct Acc {
        activity: CustomerActivity,
        latest: DateTime<Utc>,
    }

    let mut groups: HashMap<String, Acc> = HashMap::new();

    for spend in activity {
        let group_key = match key {
            CustomerKey::UserId => spend.customer_id.to_string(),
            CustomerKey::FullName => spend.full_name.clone(),
        };
        let acc = groups.entry(group_key).or_insert_with(|| Acc {
            activity: CustomerActivity {
                customer_id: match key {
                    CustomerKey::UserId => Some(spend.customer_id),
                    CustomerKey::FullName => None,
                },
                name: spend.full_name.clone(),
                order_count: 0,
                total_spent: Money::zero(),
            },
            latest: spend.at,
        });

        acc.activity.order_count += 1;
        acc.activity.total_spent += spend.amount;
        if spend.at > acc.latest {
            acc.latest = spend.at;
            acc.activity.name = spend.full_name;
        }
    }

    let mut rows: Vec<CustomerActivity> = groups.into_values().map(|a| a.activity).collect();
    rows.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

// =============================================================================
// Tabular Export
// =============================================================================

/// A titled table of display strings, ready for an external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        ReportTable {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn percentage(part: i64, whole: i64) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

pub fn products_table(products: &[Product], currency: &str) -> ReportTable {
    let mut table = ReportTable::new(
        "Inventory Report",
        &["Code", "Name", "Price", "Stock", "Category"],
    );
    for p in products {
        table.push_row(vec![
            p.code.clone(),
            p.name.clone(),
            p.price.format_with(currency),
            p.stock_qty.to_string(),
            p.category.clone(),
        ]);
    }
    table
}

pub fn customers_table(customers: &[User]) -> ReportTable {
    let mut table = ReportTable::new(
        "Customer List",
        &["Username", "Full Name", "Email", "Phone"],
    );
    for c in customers {
        table.push_row(vec![
            c.username.clone(),
            c.full_name.clone(),
            c.email.clone(),
            c.phone.clone(),
        ]);
    }
    table
}

pub fn sales_table(sales: &[SaleRecord], currency: &str) -> ReportTable {
    let mut table = ReportTable::new(
        "Sales Report",
        &["Date", "Customer", "Item", "Qty", "Total", "Payment", "Bank"],
    );
    for s in sales {
        table.push_row(vec![
            s.sold_at.format(SERVICE_DATE_FORMAT).to_string(),
            s.full_name.clone(),
            s.product_name.clone(),
            s.quantity.to_string(),
            s.total_price.format_with(currency),
            s.payment_method.to_string(),
            s.bank_name.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

pub fn pending_services_table(services: &[Service], currency: &str) -> ReportTable {
    let mut table = ReportTable::new(
        "Pending Services",
        &["Booked", "Customer", "Service", "Scheduled", "Details", "Total", "Status"],
    );
    for s in services {
        table.push_row(vec![
            s.created_at.format(SERVICE_DATE_FORMAT).to_string(),
            s.full_name.clone(),
            s.service_type.clone(),
            scheduled_label(s.scheduled_for),
            s.description.clone(),
            s.price.format_with(currency),
            s.status.to_string(),
        ]);
    }
    table
}

pub fn completed_services_table(services: &[CompletedService], currency: &str) -> ReportTable {
    let mut table = ReportTable::new(
        "Service History",
        &["Date Completed", "Customer", "Service", "Status", "Total", "Date Started"],
    );
    for s in services {
        table.push_row(vec![
            s.completed_at.format(SERVICE_DATE_FORMAT).to_string(),
            s.full_name.clone(),
            s.service_type.clone(),
            ServiceStatus::Completed.to_string(),
            s.price.format_with(currency),
            s.started_at.format(SERVICE_DATE_FORMAT).to_string(),
        ]);
    }
    table
}

pub fn revenue_table(revenue: &RevenueBreakdown, currency: &str) -> ReportTable {
    let mut table = ReportTable::new("Revenue Breakdown", &["Source", "Amount", "Percentage"]);
    let total = revenue.total().cents();
    for (source, amount) in revenue.entries() {
        table.push_row(vec![
            source.to_string(),
            amount.format_with(currency),
            percentage(amount.cents(), total),
        ]);
    }
    table
}

pub fn orders_table(orders: &OrdersBreakdown) -> ReportTable {
    let mut table = ReportTable::new("Orders Breakdown", &["Category", "Count", "Percentage"]);
    let total = orders.total();
    for (category, count) in orders.entries() {
        table.push_row(vec![
            category.to_string(),
            count.to_string(),
            percentage(count, total),
        ]);
    }
    table
}

pub fn stock_table(stock: &[CategoryStock]) -> ReportTable {
    let mut table = ReportTable::new(
        "Stock Breakdown",
        &["Category", "Items", "Total Stock", "Low Stock"],
    );
    for c in stock {
        table.push_row(vec![
            c.category.clone(),
            c.item_count.to_string(),
            c.total_stock.to_string(),
            c.low_stock_count.to_string(),
        ]);
    }
    table
}

pub fn customer_activity_table(customers: &[CustomerActivity], currency: &str) -> ReportTable {
    let mut table = ReportTable::new(
        "Customer Analysis",
        &["Customer", "Total Orders", "Total Spent"],
    );
    for c in customers {
        table.push_row(vec![
            c.name.clone(),
            c.order_count.to_string(),
            c.total_spent.format_with(currency),
        ]);
    }
    table
}

fn scheduled_label(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "TBD".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap()
    }

    fn sale(customer_id: UserId, name: &str, total: i64, day: u32) -> SaleRecord {
        SaleRecord {
            sale_id: day as i64,
            sold_at: at(day),
            customer_id,
            full_name: name.to_string(),
            product_name: "SSD 1TB".to_string(),
            quantity: 1,
            total_price: Money::from_major(total),
            payment_method: PaymentMethod::CashOnPickup,
            bank_name: None,
        }
    }

    fn completed(customer_id: UserId, name: &str, price: i64) -> CompletedService {
        CompletedService {
            id: 1,
            service_id: 7,
            customer_id,
            full_name: name.to_string(),
            service_type: "System Reformat".to_string(),
            description: String::new(),
            scheduled_for: None,
            price: Money::from_major(price),
            started_at: at(1),
            completed_at: at(2),
        }
    }

    fn product(category: &str, stock: i64) -> Product {
        Product {
            id: 1,
            code: "1001".to_string(),
            name: "Item".to_string(),
            price: Money::from_major(100),
            stock_qty: stock,
            category: category.to_string(),
            details: None,
            is_active: true,
        }
    }

    #[test]
    fn test_revenue_breakdown() {
        let sales = [sale(1, "Juan", 1_000, 1), sale(2, "Ana", 500, 2)];
        let done = [completed(1, "Juan", 500)];
        let revenue = revenue_breakdown(&sales, &done);

        assert_eq!(revenue.product_sales, Money::from_major(1_500));
        assert_eq!(revenue.services, Money::from_major(500));
        assert_eq!(revenue.total(), Money::from_major(2_000));

        let table = revenue_table(&revenue, "₱");
        assert_eq!(table.rows[0], vec!["Product Sales", "₱1,500.00", "75.0%"]);
        assert_eq!(table.rows[1][2], "25.0%");
    }

    #[test]
    fn test_orders_breakdown_ignores_completed_status() {
        let pending = |status| Service {
            id: 1,
            customer_id: 1,
            full_name: "Juan".to_string(),
            service_type: "System Reformat".to_string(),
            description: String::new(),
            scheduled_for: None,
            price: Money::from_major(500),
            status,
            created_at: at(1),
        };
        let services = [
            pending(ServiceStatus::Pending),
            pending(ServiceStatus::Cancelled),
            pending(ServiceStatus::Completed),
        ];
        let orders = orders_breakdown(4, 1, &services);
        assert_eq!(orders.pending_services, 2);
        assert_eq!(orders.total(), 7);
    }

    #[test]
    fn test_stock_breakdown() {
        let products = [
            product("Storage", 10),
            product("Memory", 5),
            product("Storage", 2),
            product("Memory", 6),
        ];
        let stock = stock_breakdown(&products, 5);

        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0].category, "Memory");
        assert_eq!(stock[0].total_stock, 11);
        assert_eq!(stock[0].low_stock_count, 1);
        assert_eq!(stock[1].item_count, 2);
        assert_eq!(stock[1].low_stock_count, 1);
    }

    #[test]
    fn test_customer_breakdown_by_user_id_keeps_namesakes_apart() {
        let sales = [
            sale(1, "Juan Dela Cruz", 300, 1),
            sale(2, "Juan Dela Cruz", 200, 2),
            sale(1, "Juan D. Cruz", 300, 3),
        ];
        let done = [completed(2, "Juan Dela Cruz", 500)];
        let activity = sales
            .iter()
            .map(CustomerSpend::from)
            .chain(done.iter().map(CustomerSpend::from));

        let rows = customer_breakdown(activity, CustomerKey::UserId, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer_id, Some(2));
        assert_eq!(rows[0].total_spent, Money::from_major(700));
        assert_eq!(rows[1].name, "Juan D. Cruz");
        assert_eq!(rows[1].order_count, 2);
    }

    #[test]
    fn test_customer_breakdown_by_name_merges_namesakes() {
        let sales = [
            sale(1, "Juan Dela Cruz", 300, 1),
            sale(2, "Juan Dela Cruz", 200, 2),
            sale(3, "Ana Reyes", 500, 3),
        ];
        let rows = customer_breakdown(
            sales.iter().map(CustomerSpend::from),
            CustomerKey::FullName,
            None,
        );
        assert_eq!(rows.len(), 2);
        // equal spend: ordered by name
        assert_eq!(rows[0].name, "Ana Reyes");
        assert_eq!(rows[1].order_count, 2);
        assert_eq!(rows[1].customer_id, None);
    }

    #[test]
    fn test_customer_breakdown_limit() {
        let sales: Vec<SaleRecord> = (1..=5).map(|i| sale(i, "C", i * 100, 1)).collect();
        let rows = customer_breakdown(
            sales.iter().map(CustomerSpend::from),
            CustomerKey::UserId,
            Some(3),
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].customer_id, Some(5));
    }

    #[test]
    fn test_customer_key_parse() {
        assert_eq!("user_id".parse::<CustomerKey>().unwrap(), CustomerKey::UserId);
        assert_eq!("FULL_NAME".parse::<CustomerKey>().unwrap(), CustomerKey::FullName);
        assert!("email".parse::<CustomerKey>().is_err());
    }

    #[test]
    fn test_table_json_export() {
        let table = sales_table(&[sale(1, "Juan", 1_000, 4)], "₱");
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows[0][6], "-");

        let json = table.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Sales Report");
        assert_eq!(value["rows"][0][1], "Juan");
    }

    #[test]
    fn test_empty_percentages() {
        let table = orders_table(&OrdersBreakdown::default());
        assert!(table.rows.iter().all(|r| r[2] == "0.0%"));
    }
}
