//! `(success, message, data)` envelope for the presentation layer.
//!
//! Commands return [`ApiResult`]; screens that only show a status line and
//! maybe a payload convert it with `Outcome::from`.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{ApiResult, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    /// Set on failure only.
    pub error_code: Option<ErrorCode>,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Outcome {
            success: true,
            message: message.into(),
            error_code: None,
            data: Some(data),
        }
    }

    /// Like `From<ApiResult<T>>` but with a success message of the caller's
    /// choosing.
    pub fn with_message(result: ApiResult<T>, message: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(data) => {
                let text = message(&data);
                Outcome::ok(data, text)
            }
            Err(err) => Outcome {
                success: false,
                message: err.message,
                error_code: Some(err.code),
                data: None,
            },
        }
    }
}

impl<T> From<ApiResult<T>> for Outcome<T> {
    fn from(result: ApiResult<T>) -> Self {
        Outcome::with_message(result, |_| "Success".to_string())
    }
}
