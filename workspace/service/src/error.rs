use sea_orm::SqlErr;
use thiserror::Error;
use tracing::{error, warn};

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(sea_orm::DbErr),

    /// Requested record does not exist (or is hidden from the caller)
    #[error("{0} not found")]
    NotFound(String),

    /// Username, e-mail or another unique value is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input failed a business rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation is not allowed in the record's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unknown user, wrong password or deactivated account
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Caller is authenticated but not allowed to touch the record
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Unique-key violations become `Conflict`; they surface when a concurrent
/// writer takes a username or e-mail between the check and the insert.
impl From<sea_orm::DbErr> for ServiceError {
    fn from(error: sea_orm::DbErr) -> Self {
        match error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!(%detail, "Unique constraint violated");
                ServiceError::Conflict("Username or email already exists".to_string())
            }
            _ => ServiceError::Database(error),
        }
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(error: bcrypt::BcryptError) -> Self {
        let err = ServiceError::PasswordHash(error.to_string());
        error!(?err, "Password hashing failed");
        err
    }
}

impl ServiceError {
    pub fn not_found(what: impl std::fmt::Display, id: i32) -> Self {
        ServiceError::NotFound(format!("{} with ID {}", what, id))
    }
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
