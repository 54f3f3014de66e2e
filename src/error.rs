// Error handling module for the Ticket API
// Provides the HTTP-facing error type and response conversion

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::tickets::InvalidPurchaseError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
///
/// Each variant maps to a specific HTTP status code and error response format.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A purchase broke a ticket rule or was refused by a collaborator
    /// Maps to HTTP 400 Bad Request
    #[error(transparent)]
    InvalidPurchase(#[from] InvalidPurchaseError),

    /// Request body could not be read as JSON of the expected shape
    /// Maps to HTTP 400 Bad Request
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    /// Details are withheld from client responses
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Consistent error response structure
///
/// Provides both a machine-readable `error_code` and a human-readable `message`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "INVALID_PURCHASE")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String) -> Self {
        Self {
            error_code: error_code.to_string(),
            message,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Log level follows severity:
    /// - error!: internal errors (500-level)
    /// - warn!: rejected purchases
    /// - debug!: malformed requests
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let response = match self {
            ApiError::InvalidPurchase(purchase_error) => {
                warn!("Invalid purchase: {}", purchase_error);

                let mut response =
                    ErrorResponse::new("INVALID_PURCHASE", purchase_error.to_string());
                response.details = Some(serde_json::json!({
                    "reason": purchase_error.reason().to_string(),
                }));
                response
            }
            ApiError::BadRequest(message) => {
                debug!("Malformed request: {}", message);

                ErrorResponse::new("BAD_REQUEST", message.clone())
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);

                // Generic message only, no internal detail
                ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (self.status_code(), response)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPurchase(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert axum JSON extraction failures to ApiError
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
