pub mod account;
pub mod activity;
pub mod agreement;
pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod property;
pub mod verification;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;

use crate::error::AdminError;

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AdminError> {
    body.map(|Json(v)| v)
        .map_err(|e| AdminError::Validation(e.body_text()))
}

pub(crate) fn parse_query<T: DeserializeOwned + Default>(
    raw: Option<String>,
) -> Result<T, AdminError> {
    raw.as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| AdminError::Validation(format!("query: {e}")))
        .map(Option::unwrap_or_default)
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
