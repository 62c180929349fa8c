//! Read-only example catalogs.
//!
//! An [`ExampleCatalog`] exposes a pre-existing directory tree (built-in
//! example programs, or wish configs) to clients: it lists every regular file
//! under the root as a `/`-separated relative path, and reads single files by
//! validated [`sml_types::CatalogKey`]. Nothing in a catalog is
//! content-addressed or written by this system.

pub mod catalog;
pub mod error;
pub mod walk;

pub use catalog::ExampleCatalog;
pub use error::{CatalogError, CatalogResult};
pub use walk::list_tree;
