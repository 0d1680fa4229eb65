use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use service::ServiceError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Authentication required")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
            ServiceError::Conflict(message) => Self::new(StatusCode::CONFLICT, "CONFLICT", message),
            ServiceError::Validation(message) => Self::bad_request(message),
            ServiceError::InvalidState(message) => {
                Self::new(StatusCode::CONFLICT, "INVALID_STATE", message)
            }
            ServiceError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password",
            ),
            ServiceError::Forbidden(message) => Self::forbidden(message),
            ServiceError::Database(e) => {
                error!("Database error: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error")
            }
            ServiceError::PasswordHash(e) => {
                error!("Password hashing failed: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = %self.status, code = self.code, "{}", self.message);
        }
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
            success: false,
        };
        (self.status, Json(body)).into_response()
    }
}
