use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use comanda_store::error::StoreError;

pub mod customers;
pub mod health;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod users;

/// Error shape returned by every route. Internal detail goes to the log, not
/// the body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 — request shape was fine but a field failed validation.
    Validation(String),
    /// 404 — the addressed entity does not exist.
    NotFound(String),
    /// 500 — database failure; body carries a generic message only.
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Database(e) => {
                error!(error = %e, "database operation failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

pub(crate) fn require_max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ApiError> {
    if value.len() > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn require_opt_max_len(
    field: &'static str,
    value: Option<&String>,
    max: usize,
) -> Result<(), ApiError> {
    match value {
        Some(v) => require_max_len(field, v, max),
        None => Ok(()),
    }
}

/// Shape check only — one '@' with something on both sides. Deliverability
/// is not our problem.
pub(crate) fn require_email(value: &str) -> Result<(), ApiError> {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ApiError::Validation("invalid email".to_string()));
    }
    Ok(())
}

/// Delivery-window bounds must be HH:MM when present.
pub(crate) fn require_delivery_time(value: Option<&String>) -> Result<(), ApiError> {
    if let Some(v) = value {
        comanda_core::types::parse_delivery_time(v)
            .map_err(|_| ApiError::Validation("Invalid time format".to_string()))?;
    }
    Ok(())
}
