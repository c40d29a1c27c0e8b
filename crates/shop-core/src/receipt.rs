//! # Receipt
//!
//! What a successful checkout hands back: the itemised record of the
//! committed sale lines, plus the 40-column text rendering printed for
//! the customer.
//!
//! ## Layout
//! ```text
//! ========================================
//!             OFFICIAL RECEIPT
//! ========================================
//! Date:     2025-03-14 02:05 PM
//! Customer: Juan Dela Cruz
//! Payment:  Bank Transfer
//! Bank:     BDO
//! Account:  0012-3456-7890
//!
//! ----------------------------------------
//! ITEM               QTY   PRICE    TOTAL
//! ----------------------------------------
//! Kingston 16GB DD..   2     500     1000
//!
//! ----------------------------------------
//! GRAND TOTAL:                ₱1,000.00
//! ========================================
//!        THANK YOU FOR SHOPPING!
//! ========================================
//! ```
//!
//! Rendering is pure formatting over already-committed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{BankDetails, Payment, PaymentMethod, SaleId};

const RECEIPT_WIDTH: usize = 40;
const ITEM_COLUMN: usize = 18;

/// One purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub product_code: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Record of a committed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    #[ts(as = "String")]
    pub receipt_id: Uuid,
    /// `YYYYMMDD-HHMMSS-NNNN`
    pub receipt_number: String,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    pub bank_details: Option<BankDetails>,
    pub lines: Vec<ReceiptLine>,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    /// Sale rows written by the checkout, one per line.
    pub sale_ids: Vec<SaleId>,
}

impl Receipt {
    /// Builds the receipt for committed sale lines.
    pub fn new(
        customer_name: impl Into<String>,
        payment: &Payment,
        lines: Vec<ReceiptLine>,
        sale_ids: Vec<SaleId>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let grand_total = lines.iter().map(|l| l.line_total).sum();
        let sequence = sale_ids.first().copied().unwrap_or_default();

        Receipt {
            receipt_id: Uuid::new_v4(),
            receipt_number: receipt_number(issued_at, sequence),
            customer_name: customer_name.into(),
            payment_method: payment.method,
            bank_details: payment.recorded_bank().cloned(),
            lines,
            grand_total,
            issued_at,
            sale_ids,
        }
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Renders the printable 40-column receipt.
    pub fn render(&self, format: &ReceiptFormat) -> String {
        let dbl_line = "=".repeat(RECEIPT_WIDTH);
        let line = "-".repeat(RECEIPT_WIDTH);
        let mut out = String::new();

        // writes into a String cannot fail
        let _ = writeln!(out, "{}", dbl_line);
        if let Some(store) = format.store_name.as_deref() {
            let _ = writeln!(out, "{:^width$}", store, width = RECEIPT_WIDTH);
        }
        let _ = writeln!(out, "{:^width$}", "OFFICIAL RECEIPT", width = RECEIPT_WIDTH);
        let _ = writeln!(out, "{}", dbl_line);
        let _ = writeln!(out, "Date:     {}", self.issued_at.format(&format.date_format));
        let _ = writeln!(out, "Customer: {}", self.customer_name);
        let _ = writeln!(out, "Payment:  {}", self.payment_method);
        if let Some(bank) = &self.bank_details {
            let _ = writeln!(out, "Bank:     {}", bank.bank_name);
            let _ = writeln!(out, "Account:  {}", bank.account_number);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", line);
        let _ = writeln!(
            out,
            "{:<18} {:>3} {:>7} {:>8}",
            "ITEM", "QTY", "PRICE", "TOTAL"
        );
        let _ = writeln!(out, "{}", line);
        for item in &self.lines {
            let _ = writeln!(
                out,
                "{:<18} {:>3} {:>7} {:>8}",
                receipt_item_name(&item.name),
                item.quantity,
                whole_units(item.unit_price),
                whole_units(item.line_total)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", line);
        let _ = writeln!(
            out,
            "GRAND TOTAL: {:>24}",
            self.grand_total.format_with(&format.currency_symbol)
        );
        let _ = writeln!(out, "{}", dbl_line);
        let _ = writeln!(out, "{:^width$}", "THANK YOU FOR SHOPPING!", width = RECEIPT_WIDTH);
        let _ = writeln!(out, "{}", dbl_line);
        out
    }
}

/// Presentation settings for [`Receipt::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFormat {
    pub currency_symbol: String,
    /// chrono format string for the date line.
    pub date_format: String,
    /// Printed above the title when set.
    pub store_name: Option<String>,
}

impl Default for ReceiptFormat {
    fn default() -> Self {
        ReceiptFormat {
            currency_symbol: "₱".to_string(),
            date_format: "%Y-%m-%d %I:%M %p".to_string(),
            store_name: None,
        }
    }
}

/// `YYYYMMDD-HHMMSS-NNNN`, NNNN taken from the first sale id.
pub fn receipt_number(issued_at: DateTime<Utc>, sequence: i64) -> String {
    format!(
        "{}-{:04}",
        issued_at.format("%Y%m%d-%H%M%S"),
        sequence.rem_euclid(10_000)
    )
}

/// Names wider than the item column are cut to 16 characters plus `..`.
fn receipt_item_name(name: &str) -> String {
    if name.chars().count() > ITEM_COLUMN {
        let mut cut: String = name.chars().take(ITEM_COLUMN - 2).collect();
        cut.push_str("..");
        cut
    } else {
        name.to_string()
    }
}

/// Amount rounded to whole currency units, as printed in the item table.
fn whole_units(amount: Money) -> i64 {
    let cents = amount.cents();
    let half = if cents < 0 { -50 } else { 50 };
    (cents + half) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_lines() -> Vec<ReceiptLine> {
        vec![
            ReceiptLine {
                product_code: "1001".to_string(),
                name: "Kingston 16GB DDR4 3200MHz".to_string(),
                quantity: 2,
                unit_price: Money::from_major(500),
                line_total: Money::from_major(1_000),
            },
            ReceiptLine {
                product_code: "1002".to_string(),
                name: "Thermal Paste".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(24_950),
                line_total: Money::from_cents(24_950),
            },
        ]
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 14, 5, 9).unwrap()
    }

    #[test]
    fn test_new_receipt_totals() {
        let receipt = Receipt::new(
            "Juan Dela Cruz",
            &Payment::cash_on_pickup(),
            sample_lines(),
            vec![42, 43],
            issued_at(),
        );
        assert_eq!(receipt.grand_total, Money::from_cents(124_950));
        assert_eq!(receipt.item_count(), 3);
        assert_eq!(receipt.receipt_number, "20250314-140509-0042");
        assert!(receipt.bank_details.is_none());
    }

    #[test]
    fn test_render_cash() {
        let receipt = Receipt::new(
            "Juan Dela Cruz",
            &Payment::cash_on_pickup(),
            sample_lines(),
            vec![1, 2],
            issued_at(),
        );
        let text = receipt.render(&ReceiptFormat::default());

        assert!(text.contains("OFFICIAL RECEIPT"));
        assert!(text.contains("Date:     2025-03-14 02:05 PM"));
        assert!(text.contains("Payment:  Cash on Pickup"));
        assert!(!text.contains("Bank:"));
        assert!(text.contains("Kingston 16GB DD..   2     500     1000"));
        assert!(text.contains("Thermal Paste        1     250      250"));
        assert!(text.contains("GRAND TOTAL:                ₱1,249.50"));
        assert!(text.contains("THANK YOU FOR SHOPPING!"));
    }

    #[test]
    fn test_render_bank_transfer() {
        let receipt = Receipt::new(
            "Juan Dela Cruz",
            &Payment::bank_transfer("BDO", "0012-3456-7890"),
            sample_lines(),
            vec![1, 2],
            issued_at(),
        );
        let format = ReceiptFormat {
            store_name: Some("Computer Parts and Services".to_string()),
            ..ReceiptFormat::default()
        };
        let text = receipt.render(&format);

        assert!(text.contains("Computer Parts and Services"));
        assert!(text.contains("Bank:     BDO"));
        assert!(text.contains("Account:  0012-3456-7890"));
    }

    #[test]
    fn test_item_name_truncation() {
        assert_eq!(receipt_item_name("Short name"), "Short name");
        assert_eq!(receipt_item_name(&"x".repeat(18)), "x".repeat(18));
        assert_eq!(
            receipt_item_name(&"y".repeat(19)),
            format!("{}..", "y".repeat(16))
        );
    }
}
