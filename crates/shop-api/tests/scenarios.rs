//! End-to-end shop scenarios through the command layer.

use shop_api::commands::{auth, cart, catalog, checkout, reports, services};
use shop_api::commands::auth::RegisterRequest;
use shop_api::{ErrorCode, Outcome, Session, Shop, ShopConfig};
use shop_core::{BookingRequest, Money, NewProduct, Payment, ServiceStatus};
use shop_db::{Database, DbConfig, ReportKind};

// =============================================================================
// Helpers
// =============================================================================

async fn open_shop() -> Shop {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let shop = Shop::with_database(db, ShopConfig::default());
    assert_eq!(shop.ensure_default_accounts().await.unwrap(), 2);
    shop
}

async fn manager(shop: &Shop) -> Session {
    auth::login(shop, "manager", "admin123").await.unwrap()
}

async fn customer(shop: &Shop) -> Session {
    auth::login(shop, "user", "user123").await.unwrap()
}

fn registration(username: &str, full_name: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: "Passw0rd".to_string(),
        full_name: full_name.to_string(),
        email: format!("{username}@gmail.com"),
        phone: "09123456789".to_string(),
    }
}

async fn stock_product(shop: &Shop, boss: &Session, name: &str, price: i64, stock: i64) -> String {
    let code = catalog::next_product_code(shop, boss).await.unwrap();
    catalog::add_product(
        shop,
        boss,
        NewProduct {
            code: code.clone(),
            name: name.to_string(),
            price: Money::from_major(price),
            stock_qty: stock,
            category: "Storage".to_string(),
            details: None,
        },
    )
    .await
    .unwrap();
    code
}

fn booking(service_type: &str) -> BookingRequest {
    BookingRequest {
        service_type: service_type.to_string(),
        scheduled_for: "2025-03-14".to_string(),
        description: "Laptop is slow".to_string(),
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn short_username_is_rejected_without_creating_an_account() {
    let shop = open_shop().await;

    let err = auth::register(&shop, &registration("ab", "Jo Santos"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "Username must be at least 3 characters long");
    assert!(!shop.db().users().exists("ab").await.unwrap());
}

#[tokio::test]
async fn register_login_and_duplicate_username() {
    let shop = open_shop().await;

    let id = auth::register(&shop, &registration("jo_santos", "Jo Santos"))
        .await
        .unwrap();
    let session = auth::login(&shop, "jo_santos", "Passw0rd").await.unwrap();
    assert_eq!(session.user_id(), id);
    assert!(!session.user().is_manager());

    let err = auth::register(&shop, &registration("jo_santos", "Jo Other"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let err = auth::login(&shop, "jo_santos", "wrong").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Invalid username or password");
}

#[tokio::test]
async fn customers_cannot_use_manager_commands() {
    let shop = open_shop().await;
    let juan = customer(&shop).await;

    assert_eq!(
        reports::dashboard(&shop, &juan).await.unwrap_err().code,
        ErrorCode::Unauthorized
    );
    assert_eq!(
        catalog::next_product_code(&shop, &juan).await.unwrap_err().code,
        ErrorCode::Unauthorized
    );
    assert_eq!(
        auth::list_customers(&shop, &juan).await.unwrap_err().code,
        ErrorCode::Unauthorized
    );

    let customers = auth::list_customers(&shop, &manager(&shop).await).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].full_name, "Juan Dela Cruz");
}

// =============================================================================
// Shopping
// =============================================================================

#[tokio::test]
async fn browse_add_to_cart_and_check_out() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let ssd = stock_product(&shop, &boss, "SSD 1TB", 500, 5).await;
    assert_eq!(ssd, "1001");

    let found = catalog::list_products(&shop, Some("All"), Some("ssd")).await.unwrap();
    assert_eq!(found.len(), 1);

    let juan = customer(&shop).await;
    cart::add_to_cart(&shop, &juan, &ssd, Some(1)).await.unwrap();
    let summary = cart::add_to_cart(&shop, &juan, &ssd, Some(1)).await.unwrap();
    assert_eq!(summary.item_count, 1);
    assert_eq!(summary.total_quantity, 2);
    assert_eq!(summary.total, Money::from_major(1_000));

    let done = checkout::checkout(&shop, &juan, &Payment::bank_transfer("BDO", "001234567890"))
        .await
        .unwrap();
    assert_eq!(done.receipt.grand_total, Money::from_major(1_000));
    assert_eq!(done.receipt.customer_name, "Juan Dela Cruz");
    assert!(done.receipt_text.contains("OFFICIAL RECEIPT"));
    assert!(done.receipt_text.contains("Computer Parts and Services"));
    assert!(done.receipt_text.contains("BDO"));

    assert!(cart::get_cart(&juan).await.lines.is_empty());
    assert_eq!(catalog::get_product(&shop, &ssd).await.unwrap().stock_qty, 3);

    let history = checkout::order_history(&shop, &juan).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].product_name, "SSD 1TB");
    assert_eq!(checkout::all_sales(&shop, &boss).await.unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_fails_whole_when_stock_ran_out() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let ssd = stock_product(&shop, &boss, "SSD 1TB", 500, 5).await;

    let juan = customer(&shop).await;
    cart::add_to_cart(&shop, &juan, &ssd, Some(2)).await.unwrap();

    // someone else buys first, leaving 1
    auth::register(&shop, &registration("ana_reyes", "Ana Reyes"))
        .await
        .unwrap();
    let ana = auth::login(&shop, "ana_reyes", "Passw0rd").await.unwrap();
    cart::add_to_cart(&shop, &ana, &ssd, Some(4)).await.unwrap();
    checkout::checkout(&shop, &ana, &Payment::cash_on_pickup())
        .await
        .unwrap();

    let err = checkout::checkout(&shop, &juan, &Payment::cash_on_pickup())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
    assert_eq!(err.message, "Not enough stock for SSD 1TB: available 1, requested 2");

    let left = cart::get_cart(&juan).await;
    assert_eq!(left.lines.len(), 1);
    assert_eq!(left.lines[0].quantity, 2);
    assert!(checkout::order_history(&shop, &juan).await.unwrap().is_empty());
    assert_eq!(catalog::get_product(&shop, &ssd).await.unwrap().stock_qty, 1);
}

#[tokio::test]
async fn cart_edits_and_missing_items() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let ssd = stock_product(&shop, &boss, "SSD 1TB", 500, 3).await;
    let juan = customer(&shop).await;

    let err = cart::add_to_cart(&shop, &juan, "9999", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    cart::add_to_cart(&shop, &juan, &ssd, None).await.unwrap();
    let err = cart::add_to_cart(&shop, &juan, &ssd, Some(3)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let summary = cart::update_cart_item(&juan, &ssd, 3).await.unwrap();
    assert_eq!(summary.total, Money::from_major(1_500));

    let err = cart::update_cart_item(&juan, "9999", 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Item 9999 not found in cart");

    assert!(cart::remove_from_cart(&juan, &ssd).await.lines.is_empty());
    assert!(cart::remove_from_cart(&juan, &ssd).await.lines.is_empty());

    cart::add_to_cart(&shop, &juan, &ssd, Some(2)).await.unwrap();
    let summary = cart::remove_from_cart(&juan, "NOPE").await;
    assert_eq!(summary.lines.len(), 1);
    assert_eq!(summary.total, Money::from_major(1_000));
    cart::clear_cart(&juan).await;

    let err = checkout::checkout(&shop, &juan, &Payment::cash_on_pickup())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "Cart is empty");
}

#[tokio::test]
async fn deleted_products_disappear_from_the_shop() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let code = stock_product(&shop, &boss, "SSD 1TB", 500, 3).await;
    let product = catalog::get_product(&shop, &code).await.unwrap();

    let restocked = catalog::restock_product(&shop, &boss, product.id, 7).await.unwrap();
    assert_eq!(restocked.stock_qty, 10);

    catalog::delete_product(&shop, &boss, product.id).await.unwrap();
    assert!(catalog::list_products(&shop, None, None).await.unwrap().is_empty());
    assert_eq!(
        catalog::get_product(&shop, &code).await.unwrap_err().code,
        ErrorCode::NotFound
    );

    // codes are never reused
    assert_eq!(catalog::next_product_code(&shop, &boss).await.unwrap(), "1002");
}

// =============================================================================
// Services
// =============================================================================

#[tokio::test]
async fn book_and_complete_a_system_reformat() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let juan = customer(&shop).await;

    let booked = services::book_service(&shop, &juan, &booking("System Reformat"))
        .await
        .unwrap();
    assert_eq!(booked.confirmation.price, Money::from_major(500));
    assert!(!booked.confirmation.requires_quote);
    assert!(booked.message.contains("₱500.00"));

    let mine = services::my_services(&shop, &juan).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, ServiceStatus::Pending);

    let id = booked.confirmation.booking_id;
    let completed = services::complete_service(&shop, &boss, id).await.unwrap();
    assert_eq!(completed.price, Money::from_major(500));
    assert_eq!(completed.service_id, id);

    assert!(services::pending_services(&shop, &boss).await.unwrap().is_empty());
    let err = services::complete_service(&shop, &boss, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let history = services::service_history(&shop, &boss, 1).await.unwrap();
    assert_eq!(history.services.len(), 1);
    assert_eq!(history.total_pages, 1);

    let revenue = reports::revenue(&shop, &boss).await.unwrap();
    assert_eq!(revenue.services, Money::from_major(500));
}

#[tokio::test]
async fn custom_requests_need_a_quote() {
    let shop = open_shop().await;
    let juan = customer(&shop).await;

    let booked = services::book_service(&shop, &juan, &booking("Others (Custom Request)"))
        .await
        .unwrap();
    assert!(booked.confirmation.requires_quote);
    assert!(booked.message.contains("quote"));

    let err = services::book_service(
        &shop,
        &juan,
        &BookingRequest {
            scheduled_for: "14/03/2025".to_string(),
            ..booking("System Reformat")
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn customers_cancel_only_their_own_bookings() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let juan = customer(&shop).await;
    auth::register(&shop, &registration("ana_reyes", "Ana Reyes"))
        .await
        .unwrap();
    let ana = auth::login(&shop, "ana_reyes", "Passw0rd").await.unwrap();

    let id = services::book_service(&shop, &juan, &booking("Software Installation"))
        .await
        .unwrap()
        .confirmation
        .booking_id;

    let err = services::cancel_service(&shop, &ana, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    services::cancel_service(&shop, &juan, id).await.unwrap();
    assert!(services::pending_services(&shop, &boss).await.unwrap().is_empty());

    services::cancel_service(&shop, &juan, id).await.unwrap();
    services::cancel_service(&shop, &juan, 4242).await.unwrap();
    services::cancel_service(&shop, &boss, 4242).await.unwrap();
}

#[tokio::test]
async fn status_updates_move_completed_services() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let juan = customer(&shop).await;

    let id = services::book_service(&shop, &juan, &booking("Hardware Installation"))
        .await
        .unwrap()
        .confirmation
        .booking_id;

    services::update_service_status(&shop, &boss, id, ServiceStatus::Completed)
        .await
        .unwrap();
    assert!(services::my_services(&shop, &juan).await.unwrap().is_empty());

    let err = services::update_service_status(&shop, &boss, id, ServiceStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn dashboard_and_exports() {
    let shop = open_shop().await;
    let boss = manager(&shop).await;
    let juan = customer(&shop).await;
    let ssd = stock_product(&shop, &boss, "SSD 1TB", 500, 4).await;

    cart::add_to_cart(&shop, &juan, &ssd, Some(2)).await.unwrap();
    checkout::checkout(&shop, &juan, &Payment::cash_on_pickup())
        .await
        .unwrap();
    let id = services::book_service(&shop, &juan, &booking("Thermal Paste Repasting"))
        .await
        .unwrap()
        .confirmation
        .booking_id;
    services::complete_service(&shop, &boss, id).await.unwrap();

    let stats = reports::dashboard(&shop, &boss).await.unwrap();
    assert_eq!(stats.total_revenue, Money::from_major(1_200));
    assert_eq!(stats.sales_count, 1);
    assert_eq!(stats.total_stock, 2);
    assert_eq!(stats.customer_count, 1);

    let orders = reports::orders(&shop, &boss).await.unwrap();
    assert_eq!(orders.total(), 2);

    let stock = reports::stock(&shop, &boss).await.unwrap();
    assert_eq!(stock[0].low_stock_count, 1);

    let top = reports::customer_activity(&shop, &boss, Some(5)).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].total_spent, Money::from_major(1_200));
    assert_eq!(top[0].order_count, 2);

    let table = reports::export_report(&shop, &boss, ReportKind::Sales).await.unwrap();
    assert_eq!(table.rows.len(), 1);
    assert!(table.to_json().unwrap().contains("SSD 1TB"));
}

#[tokio::test]
async fn failures_fit_the_outcome_envelope() {
    let shop = open_shop().await;
    let juan = customer(&shop).await;

    let outcome = Outcome::from(reports::dashboard(&shop, &juan).await);
    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::Unauthorized));
    assert!(outcome.data.is_none());

    let outcome = Outcome::with_message(
        services::book_service(&shop, &juan, &booking("System Reformat"))
            .await
            .map(|booked| booked.message),
        |message| message.clone(),
    );
    assert!(outcome.success);
    assert!(outcome.message.starts_with("Service booked for 2025-03-14!"));
}
