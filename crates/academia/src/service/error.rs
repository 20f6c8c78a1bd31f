use thiserror::Error;

use academia_core::storage::RepositoryError;

/// Errors surfaced to callers of the application service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The store stayed unreachable for every attempt.
    #[error("Store unavailable: {0}")]
    Unavailable(RepositoryError),
    /// The write broke an integrity rule (duplicate or dangling reference).
    #[error("Rejected: {0}")]
    Rejected(RepositoryError),
    /// The caller sent a filter or page the store cannot answer.
    #[error("Invalid request: {0}")]
    InvalidRequest(RepositoryError),
    #[error("Storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            e if e.is_transient() => ServiceError::Unavailable(e),
            e if e.is_rejected_write() => ServiceError::Rejected(e),
            e @ (RepositoryError::InvalidFilter(_) | RepositoryError::InvalidPage(_)) => {
                ServiceError::InvalidRequest(e)
            }
            e => ServiceError::Storage(e),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
