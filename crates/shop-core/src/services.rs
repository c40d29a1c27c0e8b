//! # Service Pricing & Scheduling
//!
//! The fixed service price list and the schedule-tag codec used to read
//! descriptions written before `scheduled_for` had its own column.
//!
//! ## Service Lifecycle
//! ```text
//! ┌──────────┐  book()   ┌───────────────────┐  complete()  ┌──────────────────────┐
//! │ customer │ ────────► │ services          │ ───────────► │ completed_services   │
//! └──────────┘           │ status = pending  │  one txn:    │ started_at =         │
//!                        └─────────┬─────────┘  insert +    │   created_at         │
//!                                  │            delete      │ completed_at = now   │
//!                         cancel() │                        └──────────────────────┘
//!                                  ▼
//!                               deleted
//! ```
//!
//! ## Legacy Schedule Tags
//! Older rows carry the date inside the description:
//! `"[Scheduled: 2025-03-14] Laptop overheats"`. New rows store the date
//! in `scheduled_for` and the description untagged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;

/// Service type that is always followed up with a manual quote.
pub const CUSTOM_SERVICE: &str = "Others (Custom Request)";

/// Date format accepted when booking.
pub const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEDULE_TAG_OPEN: &str = "[Scheduled: ";
const SCHEDULE_TAG_CLOSE: char = ']';

/// Fixed price list, in display order.
pub const SERVICE_PRICES: &[(&str, Money)] = &[
    ("System Reformat", Money::from_major(500)),
    ("Deep Cleaning / Dust Removal", Money::from_major(350)),
    ("Hardware Installation", Money::from_major(300)),
    ("Troubleshooting / Diagnostics", Money::from_major(250)),
    ("Thermal Paste Repasting", Money::from_major(200)),
    ("Software Installation", Money::from_major(150)),
    (CUSTOM_SERVICE, Money::from_major(500)),
];

// =============================================================================
// Pricing
// =============================================================================

/// Listed price for a service type; unknown types are 0.00.
pub fn service_price(service_type: &str) -> Money {
    SERVICE_PRICES
        .iter()
        .find(|(name, _)| *name == service_type)
        .map(|(_, price)| *price)
        .unwrap_or_else(Money::zero)
}

/// Price quoted at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingQuote {
    pub price: Money,
    /// Staff will contact the customer with a final price.
    pub requires_quote: bool,
}

pub fn quote(service_type: &str) -> BookingQuote {
    let price = service_price(service_type);
    BookingQuote {
        price,
        requires_quote: service_type == CUSTOM_SERVICE || price.is_zero(),
    }
}

/// Confirmation text shown after booking.
pub fn booking_message(scheduled_for: NaiveDate, quote: &BookingQuote, currency: &str) -> String {
    if quote.requires_quote {
        "Service request submitted!\nOur team will contact you with a quote.".to_string()
    } else {
        format!(
            "Service booked for {}!\nEstimated Cost: {}",
            scheduled_for.format(SCHEDULE_DATE_FORMAT),
            quote.price.format_with(currency)
        )
    }
}

// =============================================================================
// Booking Input
// =============================================================================

pub fn validate_service_type(service_type: &str) -> ValidationResult<()> {
    if service_type.trim().is_empty() {
        return Err(ValidationError::required("Service type"));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` booking date.
pub fn parse_schedule_date(text: &str) -> ValidationResult<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::required("Scheduled date"));
    }
    NaiveDate::parse_from_str(text, SCHEDULE_DATE_FORMAT).map_err(|_| {
        ValidationError::format(
            "Scheduled date",
            "Scheduled date must be a valid date (YYYY-MM-DD)",
        )
    })
}

// =============================================================================
// Schedule Tag Codec
// =============================================================================

/// Embeds a date in a description: `"[Scheduled: <date>] <description>"`.
///
/// ```rust
/// use shop_core::services::{parse_tagged_description, tag_schedule};
///
/// let text = tag_schedule("2025-03-14", "Laptop overheats");
/// assert_eq!(text, "[Scheduled: 2025-03-14] Laptop overheats");
/// assert_eq!(
///     parse_tagged_description(&text),
///     (Some("2025-03-14".to_string()), "Laptop overheats".to_string())
/// );
/// ```
pub fn tag_schedule(date: &str, description: &str) -> String {
    format!("{}{}{} {}", SCHEDULE_TAG_OPEN, date, SCHEDULE_TAG_CLOSE, description)
}

/// Splits the first schedule tag out of a description.
///
/// Returns the tagged date (if any) and the description with the tag and
/// the single space after it removed. Everything else is kept verbatim, so
/// this is the exact inverse of [`tag_schedule`].
pub fn parse_tagged_description(text: &str) -> (Option<String>, String) {
    let Some(start) = text.find(SCHEDULE_TAG_OPEN) else {
        return (None, text.to_string());
    };
    let date_start = start + SCHEDULE_TAG_OPEN.len();
    let Some(len) = text[date_start..].find(SCHEDULE_TAG_CLOSE) else {
        return (None, text.to_string());
    };

    let date = text[date_start..date_start + len].to_string();
    let after = &text[date_start + len + SCHEDULE_TAG_CLOSE.len_utf8()..];
    let after = after.strip_prefix(' ').unwrap_or(after);
    (Some(date), format!("{}{}", &text[..start], after))
}

/// Resolves the schedule of a stored service row.
///
/// Rows with a `scheduled_for` value are returned as-is; older rows have
/// their date recovered from a tag in the description.
pub fn resolve_schedule(
    scheduled_for: Option<NaiveDate>,
    description: &str,
) -> (Option<NaiveDate>, String) {
    if scheduled_for.is_some() {
        return (scheduled_for, description.to_string());
    }
    match parse_tagged_description(description) {
        (Some(date), rest) => match NaiveDate::parse_from_str(date.trim(), SCHEDULE_DATE_FORMAT) {
            Ok(date) => (Some(date), rest),
            // unparseable tag: leave the description untouched
            Err(_) => (None, description.to_string()),
        },
        (None, _) => (None, description.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_table() {
        assert_eq!(service_price("System Reformat"), Money::from_major(500));
        assert_eq!(
            service_price("Deep Cleaning / Dust Removal"),
            Money::from_major(350)
        );
        assert_eq!(service_price("Software Installation"), Money::from_major(150));
        assert_eq!(service_price("Water Damage Repair"), Money::zero());
    }

    #[test]
    fn test_quote_flags_custom_and_unknown_types() {
        assert!(!quote("System Reformat").requires_quote);
        assert!(quote(CUSTOM_SERVICE).requires_quote);
        assert_eq!(quote(CUSTOM_SERVICE).price, Money::from_major(500));
        assert!(quote("Water Damage Repair").requires_quote);
    }

    #[test]
    fn test_booking_message() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            booking_message(date, &quote("System Reformat"), "₱"),
            "Service booked for 2025-03-14!\nEstimated Cost: ₱500.00"
        );
        assert!(booking_message(date, &quote(CUSTOM_SERVICE), "₱").contains("quote"));
    }

    #[test]
    fn test_tag_round_trip() {
        let cases = [
            ("2025-03-14", "Laptop overheats"),
            ("2025-12-01", ""),
            ("TBD", "Needs [extra] RAM"),
            ("2025-06-30", " padded  "),
            ("2025-06-30", "\tindented"),
        ];
        for (date, description) in cases {
            let tagged = tag_schedule(date, description);
            assert_eq!(
                parse_tagged_description(&tagged),
                (Some(date.to_string()), description.to_string())
            );
        }
    }

    #[test]
    fn test_parse_untagged_and_malformed() {
        assert_eq!(
            parse_tagged_description("  plain text "),
            (None, "  plain text ".to_string())
        );
        assert_eq!(
            parse_tagged_description("[Scheduled: 2025-01-01"),
            (None, "[Scheduled: 2025-01-01".to_string())
        );
    }

    #[test]
    fn test_parse_schedule_date() {
        assert_eq!(
            parse_schedule_date("2025-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        assert!(matches!(
            parse_schedule_date(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(parse_schedule_date("14/03/2025").is_err());
        assert!(parse_schedule_date("2025-02-30").is_err());
    }

    #[test]
    fn test_resolve_schedule() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            resolve_schedule(Some(date), "Fan noise"),
            (Some(date), "Fan noise".to_string())
        );
        assert_eq!(
            resolve_schedule(None, "[Scheduled: 2025-03-14] Fan noise"),
            (Some(date), "Fan noise".to_string())
        );
        assert_eq!(
            resolve_schedule(None, "[Scheduled: soon] Fan noise"),
            (None, "[Scheduled: soon] Fan noise".to_string())
        );
    }
}
