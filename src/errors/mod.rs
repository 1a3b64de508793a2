//! Error handling module for the parish backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// Input failed validation; nothing was attempted
    Validation(String),
    /// Malformed request body
    BadRequest(String),
    /// Required server configuration is absent
    Configuration(Vec<&'static str>),
    /// Object store failure
    Storage(String),
    /// External HTTP fetch failed or answered with an error status
    Upstream { status: StatusCode, message: String },
    /// Request body over the accepted size
    PayloadTooLarge(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Upstream { .. } => codes::UPSTREAM_ERROR,
            AppError::PayloadTooLarge(_) => codes::PAYLOAD_TOO_LARGE,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Configuration(missing) => {
                format!("Missing server configuration: {}", missing.join(", "))
            }
            AppError::Storage(msg) => msg.clone(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Upstream fetch error: {:?}", err);
        AppError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to fetch upstream resource: {}", err),
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::Configuration(missing) => Some(serde_json::json!({ "missing": missing })),
            AppError::Upstream { status, .. } => {
                Some(serde_json::json!({ "upstreamStatus": status.as_u16() }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_missing_items() {
        let err = AppError::Configuration(vec!["PARISH_S3_BUCKET", "PARISH_S3_ENDPOINT"]);

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message(),
            "Missing server configuration: PARISH_S3_BUCKET, PARISH_S3_ENDPOINT"
        );

        let body = ErrorResponse::new(&err);
        assert_eq!(body.error.code, codes::CONFIGURATION_ERROR);
        assert_eq!(
            body.error.details.unwrap()["missing"][1],
            "PARISH_S3_ENDPOINT"
        );
    }

    #[test]
    fn test_upstream_error_relays_status() {
        let err = AppError::Upstream {
            status: StatusCode::FORBIDDEN,
            message: "Failed to fetch image: 403 Forbidden".to_string(),
        };

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), codes::UPSTREAM_ERROR);
    }

    #[test]
    fn test_validation_is_client_error() {
        let err = AppError::Validation("Invalid type".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "VALIDATION_ERROR: Invalid type");
    }
}
