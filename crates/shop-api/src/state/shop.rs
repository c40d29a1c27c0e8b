//! # Shop State
//!
//! The database plus the loaded configuration. Cheap to clone; every clone
//! shares the same connection pool.

use tracing::info;

use crate::config::ShopConfig;
use crate::error::ApiResult;
use shop_db::Database;

#[derive(Debug, Clone)]
pub struct Shop {
    db: Database,
    config: ShopConfig,
}

impl Shop {
    /// Opens the configured database (running migrations) and makes sure
    /// the default accounts exist.
    pub async fn open(config: ShopConfig) -> ApiResult<Self> {
        let db = Database::new(config.db_config()).await?;
        info!(path = %config.db_path.display(), "Database connected and migrations applied");

        let shop = Shop::with_database(db, config);
        shop.ensure_default_accounts().await?;
        Ok(shop)
    }

    /// Wraps an already open database.
    pub fn with_database(db: Database, config: ShopConfig) -> Self {
        Shop { db, config }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Creates the default manager and customer accounts if missing.
    pub async fn ensure_default_accounts(&self) -> ApiResult<usize> {
        let created = self.db.credentials().ensure_default_accounts().await?;
        if created > 0 {
            info!(created, "Default accounts created");
        }
        Ok(created)
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
