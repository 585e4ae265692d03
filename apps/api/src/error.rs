//! HTTP error type.
//!
//! Every failure leaves the server as `{"error": <message>, "code": <CODE>}`.
//!
//! ```text
//! ┌──────────────────────────────┬──────────────┬──────────────────────────┐
//! │ Source                       │ Status       │ Code                     │
//! ├──────────────────────────────┼──────────────┼──────────────────────────┤
//! │ ValidationError              │ 400          │ VALIDATION_ERROR         │
//! │ ValidationError::Duplicate   │ 400          │ DUPLICATE                │
//! │ *NotFound                    │ 404          │ PRODUCT_NOT_FOUND, ...   │
//! │ InsufficientStock            │ 409          │ INSUFFICIENT_STOCK       │
//! │ CategoryInUse / HasHistory   │ 409          │ CATEGORY_IN_USE, ...     │
//! │ any of the above, stock op   │ 400          │ (same code)              │
//! │ missing / bad token          │ 401          │ UNAUTHORIZED             │
//! │ wrong username or password   │ 401          │ INVALID_CREDENTIALS      │
//! │ storage, signing, hashing    │ 500 (logged) │ INTERNAL_ERROR           │
//! └──────────────────────────────┴──────────────┴──────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;
use stockroom_engine::EngineError;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A service error on a catalog, balance or account route.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A service error on a stock movement route. Refusals answer 400.
    #[error(transparent)]
    Stock(EngineError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Engine(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Engine(err.into())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Engine(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Engine(err) => classify_engine_error(err),

            ApiError::Stock(err) => {
                let (status, code, message) = classify_engine_error(err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    (status, code, message)
                } else {
                    (StatusCode::BAD_REQUEST, code, message)
                }
            }

            ApiError::Auth(AuthError::InvalidToken(_)) | ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),

            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),

            ApiError::Auth(err) => {
                tracing::error!(error = %err, "Authentication backend error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_engine_error(err: &EngineError) -> (StatusCode, &'static str, String) {
    match err {
        EngineError::Core(core) => {
            let (status, code) = classify_core_error(core);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = %core, "Ledger integrity error");
                return internal();
            }
            (status, code, core.to_string())
        }
        EngineError::Storage(db) => {
            tracing::error!(error = %db, "Database error");
            internal()
        }
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::Validation(ValidationError::Duplicate { .. }) => {
            (StatusCode::BAD_REQUEST, "DUPLICATE")
        }
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        CoreError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
        CoreError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
        CoreError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        CoreError::InsufficientStock { .. } => (StatusCode::CONFLICT, "INSUFFICIENT_STOCK"),
        CoreError::CategoryInUse { .. } => (StatusCode::CONFLICT, "CATEGORY_IN_USE"),
        CoreError::ProductHasHistory { .. } => (StatusCode::CONFLICT, "PRODUCT_HAS_HISTORY"),
        CoreError::LedgerReplay { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
