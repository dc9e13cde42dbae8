//! Error types shared across the playground backend
//!
//! The bridge and the cart carry their own error enums; HTTP handlers
//! convert everything into `ApiError`, which renders as `{"error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the host↔widget messaging bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("request {id} ({method}) timed out after {after_secs}s")]
    Timeout {
        id: String,
        method: String,
        after_secs: u64,
    },

    #[error("host returned error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("no host window to post to")]
    Detached,

    #[error("transport closed: {0}")]
    Closed(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("price must not be negative (got {0})")]
    InvalidPrice(f64),

    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    #[error("quantity of {0} is too large")]
    QuantityOverflow(String),

    #[error("failed to persist cart: {0}")]
    Persist(#[from] std::io::Error),

    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by HTTP route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidPrice(_)
            | CartError::InvalidQuantity(_)
            | CartError::QuantityOverflow(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CartError::Persist(_) | CartError::Encode(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, "{}", self);
        } else {
            tracing::warn!(%status, "{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_errors_map_to_status() {
        let bad: ApiError = CartError::InvalidQuantity(0).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let internal: ApiError = CartError::Persist(io).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_timeout_message() {
        let err = BridgeError::Timeout {
            id: "ui-3".into(),
            method: "tools/call".into(),
            after_secs: 10,
        };
        assert_eq!(err.to_string(), "request ui-3 (tools/call) timed out after 10s");
    }
}
