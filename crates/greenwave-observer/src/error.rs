//! Error types for the observer API.
//!
//! [`ApiError`] unifies all handler failure modes into a single enum
//! with an [`IntoResponse`](axum::response::IntoResponse) implementation
//! producing the `{"error", "status"}` envelope every endpoint shares.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use greenwave_routing::error::RoutingError;

/// Errors that can occur in the observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was syntactically or semantically invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A route fetch or scoring failure, mapped per variant.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A serialization error while building a response.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Routing(e) => (routing_status(e), e.to_string()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Status mapping for routing failures: an empty result is a 404, a
/// timeout is the gateway timing out, everything else transport-shaped
/// is a bad gateway.
const fn routing_status(error: &RoutingError) -> StatusCode {
    match error {
        RoutingError::NoRoutes => StatusCode::NOT_FOUND,
        RoutingError::ProviderTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        RoutingError::ProviderUnavailable(_) | RoutingError::MalformedResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}
