//! # Domain Types
//!
//! Core domain types used throughout ShopSystem.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  one row per    │       │
//! │  │  username (uq)  │   │  code (uq)      │   │  cart line      │       │
//! │  │  role           │   │  price, stock   │   │  full_name snap │       │
//! │  └─────────────────┘   │  is_active      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐        complete()       ┌─────────────────────┐   │
//! │  │     Service     │ ──────────────────────► │  CompletedService   │   │
//! │  │  (pending)      │   move between tables   │  started_at = the   │   │
//! │  │  created_at     │                         │  service created_at │   │
//! │  └─────────────────┘                         └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sales and services copy the customer's full name at write time, so
//! history is unaffected by later profile changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Row id of a user.
pub type UserId = i64;
/// Row id of a product.
pub type ProductId = i64;
/// Row id of a sale line.
pub type SaleId = i64;
/// Row id of a pending service.
pub type ServiceId = i64;
/// Id handed back to the customer after booking; the pending service row id.
pub type BookingId = ServiceId;

// =============================================================================
// Users
// =============================================================================

/// Role of an account. Fixed at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Manager,
}

/// A registered account (password hash never leaves shop-db).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// The authenticated identity a session runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSession {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl UserSession {
    #[inline]
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

impl From<User> for UserSession {
    fn from(user: User) -> Self {
        UserSession {
            user_id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: ProductId,
    /// Human-facing unique code ("1001", "1002", ...).
    pub code: String,
    pub name: String,
    pub price: Money,
    /// Never negative.
    pub stock_qty: i64,
    pub category: String,
    pub details: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
}

impl Product {
    /// Whether current stock covers `quantity`.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock_qty >= quantity
    }

    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_qty <= threshold
    }
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub stock_qty: i64,
    pub category: String,
    pub details: Option<String>,
}

// =============================================================================
// Payments
// =============================================================================

/// How a checkout is paid. Recorded, never processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnPickup,
    BankTransfer,
}

impl PaymentMethod {
    /// Label used on receipts and in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnPickup => "Cash on Pickup",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash on pickup" | "cash_on_pickup" | "cash" => Ok(PaymentMethod::CashOnPickup),
            "bank transfer" | "bank_transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            _ => Err(ValidationError::format(
                "Payment method",
                "Payment method must be Cash on Pickup or Bank Transfer",
            )),
        }
    }
}

/// Bank account a transfer is made from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
}

/// Payment method plus the details it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub method: PaymentMethod,
    pub bank: Option<BankDetails>,
}

impl Payment {
    pub fn cash_on_pickup() -> Self {
        Payment {
            method: PaymentMethod::CashOnPickup,
            bank: None,
        }
    }

    pub fn bank_transfer(bank_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        Payment {
            method: PaymentMethod::BankTransfer,
            bank: Some(BankDetails {
                bank_name: bank_name.into(),
                account_number: account_number.into(),
            }),
        }
    }

    /// Bank transfers need a non-blank bank name and account number.
    pub fn validate(&self) -> CoreResult<()> {
        if self.method != PaymentMethod::BankTransfer {
            return Ok(());
        }
        match &self.bank {
            Some(bank)
                if !bank.bank_name.trim().is_empty() && !bank.account_number.trim().is_empty() =>
            {
                Ok(())
            }
            _ => Err(CoreError::MissingBankDetails),
        }
    }

    /// Bank details worth recording: only for bank transfers.
    pub fn recorded_bank(&self) -> Option<&BankDetails> {
        match self.method {
            PaymentMethod::BankTransfer => self.bank.as_ref(),
            PaymentMethod::CashOnPickup => None,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One sold line item. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: SaleId,
    pub customer_id: UserId,
    /// Customer name at time of sale (frozen).
    pub full_name: String,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: Money,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

/// A sale joined with its product name, for history screens and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub sale_id: SaleId,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub customer_id: UserId,
    pub full_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: Money,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
}

// =============================================================================
// Services
// =============================================================================

/// Status of a service in the pending table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl ServiceStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "Pending",
            ServiceStatus::Completed => "Completed",
            ServiceStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A booked service that has not been completed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: ServiceId,
    pub customer_id: UserId,
    pub full_name: String,
    pub service_type: String,
    pub description: String,
    #[ts(as = "Option<String>")]
    pub scheduled_for: Option<NaiveDate>,
    pub price: Money,
    pub status: ServiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A finished service, moved out of the pending table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompletedService {
    pub id: i64,
    /// Id the service had in the pending table.
    pub service_id: ServiceId,
    pub customer_id: UserId,
    pub full_name: String,
    pub service_type: String,
    pub description: String,
    #[ts(as = "Option<String>")]
    pub scheduled_for: Option<NaiveDate>,
    pub price: Money,
    /// The originating service's `created_at`.
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

/// What a customer submits when booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingRequest {
    pub service_type: String,
    /// `YYYY-MM-DD`.
    pub scheduled_for: String,
    pub description: String,
}

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
    pub service_type: String,
    #[ts(as = "String")]
    pub scheduled_for: NaiveDate,
    pub price: Money,
    /// Price is a placeholder; staff will follow up with a quote.
    pub requires_quote: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
