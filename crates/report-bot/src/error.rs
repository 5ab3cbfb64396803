//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] report_store::StoreError),

    #[error("Missing signature")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No users registered for unit: {0}")]
    NoRecipients(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingSignature | AppError::InvalidSignature => {
                (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE")
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            AppError::NoRecipients(_) => (StatusCode::NOT_FOUND, "NO_RECIPIENTS"),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::MissingSignature, StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
            (AppError::InvalidSignature, StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (AppError::InvalidPayload("x".into()), StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            (AppError::NoRecipients("Warehouse".into()), StatusCode::NOT_FOUND, "NO_RECIPIENTS"),
            (
                AppError::Store(report_store::StoreError::InvalidKey("a/b".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_and_code(), (status, code));
        }
    }

    #[test]
    fn test_no_recipients_message() {
        let error = AppError::NoRecipients("Canteen".into());
        assert_eq!(error.to_string(), "No users registered for unit: Canteen");
    }
}
