//! Content-addressed share storage.
//!
//! Every shared payload is stored as an immutable entry keyed by
//! `(domain, identifier)`, where the identifier is the SHA-256 hex digest of
//! the payload bytes.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`FsContentStore`] — one flat directory per domain, `<root>/<id><ext>`
//! - [`InMemoryContentStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Entries are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent: storing present content is a no-op that succeeds.
//! 3. A write is either complete and durable or invisible; `get` never sees a
//!    partially written entry.
//! 4. The store never interprets payload contents.
//! 5. Identifiers reach the store only as validated [`sml_types::ShareId`]s,
//!    and every resolved path is checked to stay inside its root.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{FsContentStore, ShareRoots};
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
