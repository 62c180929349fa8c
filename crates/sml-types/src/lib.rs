//! Foundation types for sml-share.
//!
//! Every other sml crate depends on `sml-types`. Client-supplied keys are
//! parsed into these types before any storage path is built, so the store
//! and catalog APIs cannot be handed an unvalidated string.
//!
//! # Key Types
//!
//! - [`ShareId`] — retrieval key for a shared payload (SHA-256 hex when server-computed)
//! - [`CatalogKey`] — relative path into a read-only example tree
//! - [`Domain`] — which content domain a payload belongs to (`code` or `wish`)
//! - [`Gated`] — outcome of an operation behind a feature toggle

pub mod domain;
pub mod error;
pub mod gated;
pub mod id;
pub mod key;

pub use domain::Domain;
pub use error::TypeError;
pub use gated::Gated;
pub use id::{is_valid_identifier, ShareId, DIGEST_HEX_LEN};
pub use key::{is_valid_catalog_key, CatalogKey};
