use sml_store::StoreError;
use sml_types::{Domain, ShareId, TypeError};

/// Errors from share operations.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// The client-supplied identifier failed validation. Storage was not
    /// touched.
    #[error("bad identifier: {0}")]
    BadIdentifier(#[from] TypeError),

    /// The identifier is well-formed but nothing is stored under it.
    #[error("no {domain} entry for {id}")]
    NotFound { domain: Domain, id: ShareId },

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The blocking storage worker panicked or was cancelled.
    #[error("storage worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result alias for share operations.
pub type ShareResult<T> = Result<T, ShareError>;
