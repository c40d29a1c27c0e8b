//! # Service Repository
//!
//! The service ledger: bookings awaiting work in `services`, finished work
//! in `completed_services`.
//!
//! ## Service Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Lifecycle                                 │
//! │                                                                         │
//! │  1. BOOK                                                               │
//! │     └── book() → services row { status: pending, price from table }    │
//! │                                                                         │
//! │  2a. COMPLETE (one transaction)                                        │
//! │     └── DELETE FROM services ... RETURNING *                           │
//! │     └── INSERT INTO completed_services (source_service_id UNIQUE)      │
//! │     └── COMMIT                                                         │
//! │         A second complete() of the same id finds no row → NotFound     │
//! │                                                                         │
//! │  2b. CANCEL                                                            │
//! │     └── DELETE FROM services (no archive)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows booked before `scheduled_for` existed carry the date as a
//! `[Scheduled: YYYY-MM-DD]` tag in the description; it is recovered when
//! the row is read.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult, StoreResult};
use shop_core::services::{parse_schedule_date, quote, resolve_schedule, validate_service_type};
use shop_core::{
    BookingConfirmation, BookingRequest, CompletedService, Money, Service, ServiceId,
    ServiceStatus, UserId,
};

const SERVICE_COLUMNS: &str = "id, customer_id, full_name, service_type, description, \
     scheduled_for, price_cents AS price, status, created_at";

const COMPLETED_COLUMNS: &str = "id, source_service_id AS service_id, customer_id, full_name, \
     service_type, description, scheduled_for, price_cents AS price, started_at, completed_at";

fn with_schedule(mut service: Service) -> Service {
    let (scheduled_for, description) = resolve_schedule(service.scheduled_for, &service.description);
    service.scheduled_for = scheduled_for;
    service.description = description;
    service
}

fn with_completed_schedule(mut service: CompletedService) -> CompletedService {
    let (scheduled_for, description) = resolve_schedule(service.scheduled_for, &service.description);
    service.scheduled_for = scheduled_for;
    service.description = description;
    service
}

/// Repository for the service ledger.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    // =========================================================================
    // Booking
    // =========================================================================

    /// Books a service for a customer at the listed price.
    ///
    /// Unknown service types are booked at 0.00 and flagged
    /// `requires_quote`; staff price them later.
    pub async fn book(
        &self,
        customer_id: UserId,
        full_name: &str,
        request: &BookingRequest,
    ) -> StoreResult<BookingConfirmation> {
        let service_type = request.service_type.trim();
        validate_service_type(service_type)?;
        let scheduled_for = parse_schedule_date(&request.scheduled_for)?;
        let quote = quote(service_type);

        debug!(
            customer_id,
            service_type = %service_type,
            scheduled_for = %scheduled_for,
            price = %quote.price,
            "Booking service"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO services (
                customer_id, full_name, service_type, description,
                scheduled_for, price_cents, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(customer_id)
        .bind(full_name)
        .bind(service_type)
        .bind(request.description.trim())
        .bind(scheduled_for)
        .bind(quote.price)
        .bind(ServiceStatus::Pending)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let booking_id = result.last_insert_rowid();
        info!(booking_id, customer_id, "Service booked");

        Ok(BookingConfirmation {
            booking_id,
            service_type: service_type.to_string(),
            scheduled_for,
            price: quote.price,
            requires_quote: quote.requires_quote,
        })
    }

    // =========================================================================
    // Pending Services
    // =========================================================================

    /// Services not yet completed, newest booking first. `Some(customer)`
    /// restricts the list to one customer.
    pub async fn list_pending(&self, customer_id: Option<UserId>) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!(
            r#"
            SELECT {SERVICE_COLUMNS}
            FROM services
            WHERE (?1 IS NULL OR customer_id = ?1)
            ORDER BY id DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(customer_id = ?customer_id, count = services.len(), "Listed pending services");
        Ok(services.into_iter().map(with_schedule).collect())
    }

    pub async fn get(&self, id: ServiceId) -> DbResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service.map(with_schedule))
    }

    /// Deletes a booking outright. Returns whether a row was removed;
    /// cancelling a missing id is not an error.
    pub async fn cancel(&self, id: ServiceId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        info!(service_id = id, removed, "Service cancelled");
        Ok(removed)
    }

    /// Moves a service to the completed ledger.
    ///
    /// ## What This Does
    /// 1. Deletes the pending row, reading it back with `RETURNING`
    /// 2. Inserts the completed row (`started_at` = booking time,
    ///    `completed_at` = now)
    /// 3. Commits both, or neither
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - the service is gone (already completed
    ///   or cancelled); nothing was written
    pub async fn complete(&self, id: ServiceId) -> DbResult<CompletedService> {
        debug!(service_id = id, "Completing service");

        let mut tx = self.pool.begin().await?;

        let pending = sqlx::query_as::<_, Service>(&format!(
            "DELETE FROM services WHERE id = ?1 RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(pending) = pending else {
            tx.rollback().await?;
            return Err(DbError::not_found("Service", id));
        };
        let pending = with_schedule(pending);
        let completed_at = Utc::now();

        let completed_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO completed_services (
                source_service_id, customer_id, full_name, service_type, description,
                scheduled_for, price_cents, started_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id
            "#,
        )
        .bind(pending.id)
        .bind(pending.customer_id)
        .bind(&pending.full_name)
        .bind(&pending.service_type)
        .bind(&pending.description)
        .bind(pending.scheduled_for)
        .bind(pending.price)
        .bind(pending.created_at)
        .bind(completed_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("service", &id.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(service_id = id, completed_id, "Service completed");

        Ok(CompletedService {
            id: completed_id,
            service_id: pending.id,
            customer_id: pending.customer_id,
            full_name: pending.full_name,
            service_type: pending.service_type,
            description: pending.description,
            scheduled_for: pending.scheduled_for,
            price: pending.price,
            started_at: pending.created_at,
            completed_at,
        })
    }

    /// Sets a service's status. `Completed` moves the service to the
    /// completed ledger; other statuses are written in place.
    pub async fn update_status(&self, id: ServiceId, status: ServiceStatus) -> DbResult<()> {
        if status == ServiceStatus::Completed {
            return self.complete(id).await.map(|_| ());
        }

        let result = sqlx::query("UPDATE services SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        debug!(service_id = id, status = %status, "Service status updated");
        Ok(())
    }

    // =========================================================================
    // Completed Services
    // =========================================================================

    /// One page of service history, newest completion first. Pages are
    /// 1-based; page 0 is treated as page 1.
    pub async fn completed_services(&self, page: u32, page_size: u32) -> DbResult<Vec<CompletedService>> {
        let page_size = page_size.max(1);
        let offset = i64::from(page.max(1) - 1) * i64::from(page_size);

        let services = sqlx::query_as::<_, CompletedService>(&format!(
            r#"
            SELECT {COMPLETED_COLUMNS}
            FROM completed_services
            ORDER BY completed_at DESC, id DESC
            LIMIT ?1 OFFSET ?2
            "#
        ))
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(services.into_iter().map(with_completed_schedule).collect())
    }

    /// The whole service history, newest completion first.
    pub async fn all_completed(&self) -> DbResult<Vec<CompletedService>> {
        let services = sqlx::query_as::<_, CompletedService>(&format!(
            "SELECT {COMPLETED_COLUMNS} FROM completed_services ORDER BY completed_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(services.into_iter().map(with_completed_schedule).collect())
    }

    pub async fn completed_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM completed_services")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Number of history pages; an empty history still has one page.
    pub async fn total_history_pages(&self, page_size: u32) -> DbResult<u32> {
        let count = self.completed_count().await?;
        let page_size = i64::from(page_size.max(1));
        let pages = (count + page_size - 1) / page_size;
        Ok(u32::try_from(pages).unwrap_or(u32::MAX).max(1))
    }

    /// Sum of completed service prices.
    pub async fn completed_revenue(&self) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(price_cents), 0) FROM completed_services",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }
}
