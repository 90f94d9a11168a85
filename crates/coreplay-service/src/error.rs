//! API error types and responses.
//!
//! Errors surface on the wire as a flat `{"error": "<reason>"}` body with a
//! 4xx status: validation problems and business-rule violations as 400,
//! missing credentials as 401, ownership violations as 403, unknown
//! resources as 404, and unique-field conflicts as 409. Nothing retries;
//! a store failure is fatal to the in-flight request only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use coreplay_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("not authenticated")]
    Unauthorized,

    /// Forbidden - valid credentials but not the owner.
    #[error("not authorized")]
    Forbidden,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request - invalid input or a business-rule violation.
    #[error("{0}")]
    BadRequest(String),

    /// Conflict - a unique field is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => Self::NotFound(format!("{entity} not found")),
            StoreError::AlreadyExists { field } => Self::Conflict(format!("{field} already taken")),
            StoreError::InsufficientCoins { .. } => Self::BadRequest("insufficient coins".into()),
            StoreError::AlreadyOwned => Self::BadRequest("item already owned".into()),
            StoreError::CodeExhausted => Self::BadRequest("code exhausted".into()),
            StoreError::CodeExpired => Self::BadRequest("code expired".into()),
            StoreError::AlreadyRedeemed => Self::BadRequest("code already redeemed".into()),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<coreplay_core::ValidationError> for ApiError {
    fn from(err: coreplay_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
