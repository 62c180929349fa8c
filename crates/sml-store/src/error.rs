use std::path::PathBuf;

use sml_types::Domain;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Moving a finished temp file to its final name failed.
    #[error("failed to persist entry to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resolved entry path left the domain's storage root.
    #[error("path escapes {domain} root: {path}")]
    OutsideRoot { domain: Domain, path: PathBuf },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
