//! Error Types
//!
//! Store-level failures and the two failure kinds a view model surfaces.

use thiserror::Error;

use crate::domain::DocumentId;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a document store.
///
/// `Clone` so a failure can be kept in published view-model state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("document {id} not found in {collection}")]
    NotFound { collection: String, id: DocumentId },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidData(err.to_string())
    }
}

/// Failures a live view model reports
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// The live stream could not be established or broke
    #[error("live subscription failed: {0}")]
    SubscriptionFailed(#[source] StoreError),

    /// A create/update/delete was rejected by the store
    #[error("write failed: {0}")]
    WriteFailed(#[source] StoreError),
}

impl ViewError {
    /// The store failure underneath
    pub fn store_error(&self) -> &StoreError {
        match self {
            ViewError::SubscriptionFailed(err) | ViewError::WriteFailed(err) => err,
        }
    }
}
