//! # Account Commands
//!
//! Login, registration and the manager's customer list.

use serde::Deserialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::ApiResult;
use crate::state::{Session, Shop};
use shop_core::validation::{
    validate_email, validate_full_name, validate_password, validate_phone, validate_username,
    FieldCheck, Registration,
};
use shop_core::{User, UserId};

/// Registration form as submitted.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Registration fields that can be checked while the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationField {
    Username,
    Password,
    FullName,
    Email,
    Phone,
}

/// Logs in and opens a session with an empty cart.
pub async fn login(shop: &Shop, username: &str, password: &str) -> ApiResult<Session> {
    debug!(username = %username, "login command");

    let user = shop.db().credentials().authenticate(username, password).await?;
    Ok(Session::new(user))
}

/// Creates a customer account. Does not log in.
pub async fn register(shop: &Shop, request: &RegisterRequest) -> ApiResult<UserId> {
    debug!(username = %request.username, "register command");

    let form = Registration {
        username: &request.username,
        password: &request.password,
        full_name: &request.full_name,
        email: &request.email,
        phone: &request.phone,
    };

    Ok(shop.db().credentials().register(&form).await?)
}

/// Live `(valid, reason)` feedback for one registration field.
pub fn check_field(field: RegistrationField, value: &str) -> FieldCheck {
    let result = match field {
        RegistrationField::Username => validate_username(value),
        RegistrationField::Password => validate_password(value),
        RegistrationField::FullName => validate_full_name(value),
        RegistrationField::Email => validate_email(value),
        RegistrationField::Phone => validate_phone(value),
    };
    FieldCheck::from(result)
}

/// Customers with their contact details. Manager only.
pub async fn list_customers(shop: &Shop, session: &Session) -> ApiResult<Vec<User>> {
    session.require_manager()?;
    debug!("list_customers command");

    Ok(shop.db().users().list_customers().await?)
}
