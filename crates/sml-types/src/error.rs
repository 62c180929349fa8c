use thiserror::Error;

/// Errors produced when parsing client-supplied keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid share identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid catalog key: {0:?}")]
    InvalidCatalogKey(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
