use thiserror::Error;

use super::{FilterError, PaginationError};

/// Errors that can occur during repository operations.
///
/// A missing identity is never an error at this layer: lookups return
/// `None` and deletes of unknown ids are no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
    #[error("Invalid page: {0}")]
    InvalidPage(#[from] PaginationError),
}

impl RepositoryError {
    /// Returns true when the store was temporarily unreachable and the same
    /// call may succeed if repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::ConnectionFailed(_))
    }

    /// Returns true when the write violated an integrity rule. Such writes
    /// must not be retried.
    pub fn is_rejected_write(&self) -> bool {
        matches!(
            self,
            RepositoryError::AlreadyExists { .. } | RepositoryError::InvalidReference(_)
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
