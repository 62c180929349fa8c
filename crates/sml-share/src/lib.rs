//! Share service.
//!
//! Two parallel flows, `code` and `wish`, over one [`sml_store::ContentStore`].
//! Submissions are hashed and stored write-once; retrievals validate the
//! client's identifier before the store is touched. Both flows short-circuit
//! with [`sml_types::Gated::Disabled`] when sharing is switched off.

pub mod error;
pub mod service;

pub use error::{ShareError, ShareResult};
pub use service::ShareService;
