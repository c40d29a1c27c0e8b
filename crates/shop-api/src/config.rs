//! Shop configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shop_core::report::CustomerKey;
use shop_core::{ReceiptFormat, DEFAULT_HISTORY_PAGE_SIZE, LOW_STOCK_THRESHOLD};
use shop_db::{DbConfig, ReportOptions};

/// Shop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a writer waits on a locked database, in milliseconds
    pub db_busy_timeout_ms: u64,

    /// Printed at the top of receipts
    pub store_name: String,

    pub currency_symbol: String,

    /// Stock level at or below which a product counts as low stock
    pub low_stock_threshold: i64,

    /// Rows per page in the completed-service history
    pub history_page_size: u32,

    /// How the customer report groups activity
    pub customer_report_key: CustomerKey,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            db_path: PathBuf::from("shop.db"),
            db_max_connections: 5,
            db_busy_timeout_ms: 5_000,
            store_name: "Computer Parts and Services".to_string(),
            currency_symbol: "₱".to_string(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
            customer_report_key: CustomerKey::UserId,
        }
    }
}

/// Reads `var`, falling back to `default` when unset.
fn parse_var<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string())),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue(var.to_string())),
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ShopConfig::default();

        let config = ShopConfig {
            db_path: env::var("SHOP_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            db_max_connections: parse_var("SHOP_DB_MAX_CONNECTIONS", defaults.db_max_connections)?,

            db_busy_timeout_ms: parse_var("SHOP_DB_BUSY_TIMEOUT_MS", defaults.db_busy_timeout_ms)?,

            store_name: env::var("SHOP_STORE_NAME").unwrap_or(defaults.store_name),

            currency_symbol: env::var("SHOP_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),

            low_stock_threshold: parse_var(
                "SHOP_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,

            history_page_size: parse_var("SHOP_HISTORY_PAGE_SIZE", defaults.history_page_size)?,

            customer_report_key: parse_var(
                "SHOP_CUSTOMER_REPORT_KEY",
                defaults.customer_report_key,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("SHOP_DB_MAX_CONNECTIONS".to_string()));
        }
        if self.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue("SHOP_LOW_STOCK_THRESHOLD".to_string()));
        }
        if self.history_page_size == 0 {
            return Err(ConfigError::InvalidValue("SHOP_HISTORY_PAGE_SIZE".to_string()));
        }
        Ok(())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.db_max_connections)
            .busy_timeout(Duration::from_millis(self.db_busy_timeout_ms))
    }

    pub fn receipt_format(&self) -> ReceiptFormat {
        ReceiptFormat {
            currency_symbol: self.currency_symbol.clone(),
            store_name: Some(self.store_name.clone()),
            ..ReceiptFormat::default()
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            currency_symbol: self.currency_symbol.clone(),
            low_stock_threshold: self.low_stock_threshold,
            customer_key: self.customer_report_key,
            top_customers: None,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
