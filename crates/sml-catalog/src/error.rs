use std::io;
use std::path::PathBuf;

use sml_types::{CatalogKey, TypeError};

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The client-supplied key failed validation.
    #[error("invalid catalog key: {0}")]
    BadKey(#[from] TypeError),

    /// The key is well-formed but names no regular file.
    #[error("catalog entry not found: {0}")]
    NotFound(CatalogKey),

    /// The resolved path left the catalog root (e.g. through a symlink).
    #[error("catalog path escapes root: {0}")]
    OutsideRoot(PathBuf),

    /// The catalog root itself could not be read.
    #[error("cannot read catalog root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
