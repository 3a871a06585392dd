use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Access denied: {0}")]
    Denied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) | DomainError::Rejected(msg) => AppError::BadRequest(msg),
            DomainError::InvalidCredentials | DomainError::Unauthenticated => {
                AppError::Denied(e.to_string())
            }
            DomainError::Forbidden(msg) => AppError::Denied(msg),
            DomainError::Storage(msg) | DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    /// Process exit status for the command line.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::NotFound => 3,
            AppError::BadRequest(_) => 2,
            AppError::Denied(_) => 4,
            AppError::Internal(_) => 1,
        }
    }
}
