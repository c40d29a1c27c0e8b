//! # Service Commands
//!
//! Booking, cancelling and completing repair/maintenance services.
//!
//! ## Service Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  customer: book_service ──► Pending ──► cancel_service ──► (deleted)    │
//! │                                │                                        │
//! │  manager:                      └──► complete_service ──► history        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::state::{Session, Shop};
use shop_core::services::{booking_message, quote, SERVICE_PRICES};
use shop_core::{
    BookingConfirmation, BookingRequest, CompletedService, Money, Service, ServiceId,
    ServiceStatus,
};

/// One entry of the service menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffer {
    pub service_type: String,
    pub price: Money,
}

/// A booking plus the message shown to the customer.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub confirmation: BookingConfirmation,
    pub message: String,
}

/// One page of the completed-service history.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub services: Vec<CompletedService>,
    pub page: u32,
    pub total_pages: u32,
}

/// The bookable services and their listed prices.
pub fn service_menu() -> Vec<ServiceOffer> {
    SERVICE_PRICES
        .iter()
        .map(|&(service_type, price)| ServiceOffer {
            service_type: service_type.to_string(),
            price,
        })
        .collect()
}

/// Books a service for the session user.
pub async fn book_service(
    shop: &Shop,
    session: &Session,
    request: &BookingRequest,
) -> ApiResult<BookingResponse> {
    debug!(user_id = session.user_id(), service_type = %request.service_type, "book_service command");

    let confirmation = shop
        .db()
        .services()
        .book(session.user_id(), &session.user().full_name, request)
        .await?;

    let message = booking_message(
        confirmation.scheduled_for,
        &quote(&confirmation.service_type),
        &shop.config().currency_symbol,
    );

    Ok(BookingResponse {
        confirmation,
        message,
    })
}

/// The session user's pending services.
pub async fn my_services(shop: &Shop, session: &Session) -> ApiResult<Vec<Service>> {
    Ok(shop.db().services().list_pending(Some(session.user_id())).await?)
}

/// Every pending service. Manager only.
pub async fn pending_services(shop: &Shop, session: &Session) -> ApiResult<Vec<Service>> {
    session.require_manager()?;
    Ok(shop.db().services().list_pending(None).await?)
}

/// Cancels a booking. Customers may only cancel their own. Cancelling a
/// booking that no longer exists succeeds.
pub async fn cancel_service(shop: &Shop, session: &Session, id: ServiceId) -> ApiResult<()> {
    debug!(service_id = id, user_id = session.user_id(), "cancel_service command");

    if !session.user().is_manager() {
        let Some(service) = shop.db().services().get(id).await? else {
            return Ok(());
        };
        if service.customer_id != session.user_id() {
            return Err(ApiError::unauthorized("You can only cancel your own bookings"));
        }
    }

    if !shop.db().services().cancel(id).await? {
        debug!(service_id = id, "Nothing to cancel");
    }
    Ok(())
}

/// Moves a pending service to the completed history. Manager only.
pub async fn complete_service(
    shop: &Shop,
    session: &Session,
    id: ServiceId,
) -> ApiResult<CompletedService> {
    session.require_manager()?;
    debug!(service_id = id, "complete_service command");

    let completed = shop.db().services().complete(id).await?;
    info!(service_id = id, by = session.user_id(), price = %completed.price, "Service completed");
    Ok(completed)
}

/// Changes a pending service's status. `Completed` completes it. Manager only.
pub async fn update_service_status(
    shop: &Shop,
    session: &Session,
    id: ServiceId,
    status: ServiceStatus,
) -> ApiResult<()> {
    session.require_manager()?;
    debug!(service_id = id, status = %status, "update_service_status command");

    Ok(shop.db().services().update_status(id, status).await?)
}

/// A page of completed services, newest first. Manager only.
pub async fn service_history(shop: &Shop, session: &Session, page: u32) -> ApiResult<HistoryPage> {
    session.require_manager()?;

    let page_size = shop.config().history_page_size;
    let page = page.max(1);
    let services = shop.db().services().completed_services(page, page_size).await?;
    let total_pages = shop.db().services().total_history_pages(page_size).await?;

    debug!(page, total_pages, rows = services.len(), "service_history command");
    Ok(HistoryPage {
        services,
        page,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_menu() {
        let menu = service_menu();
        assert_eq!(menu.len(), 7);
        assert_eq!(menu[0].service_type, "System Reformat");
        assert_eq!(menu[0].price, Money::from_major(500));
    }
}
