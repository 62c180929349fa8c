use sml_types::{Domain, ShareId};

use crate::error::StoreResult;

/// Content-addressed, write-once payload store.
///
/// All implementations must satisfy these invariants:
/// - `put` returns the SHA-256 identifier of the payload. The same bytes
///   always produce the same identifier.
/// - Entries are immutable once written. A second `put` of present content
///   writes nothing and still succeeds.
/// - `get` returns the stored bytes verbatim or `None`. It never returns a
///   partially written entry.
/// - The store treats identifiers as opaque keys and never resolves a path
///   outside the domain's storage namespace.
/// - All I/O errors are propagated, never silently ignored.
///
/// Methods are blocking. Async callers should run them on a blocking worker.
pub trait ContentStore: Send + Sync {
    /// Store `data` under its content identifier and return the identifier.
    fn put(&self, domain: Domain, data: &[u8]) -> StoreResult<ShareId>;

    /// Read an entry back.
    ///
    /// Returns `Ok(None)` if the entry does not exist.
    fn get(&self, domain: Domain, id: &ShareId) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether an entry exists.
    fn exists(&self, domain: Domain, id: &ShareId) -> StoreResult<bool>;

    /// Store several payloads and return their identifiers in order.
    ///
    /// Default implementation calls `put()` for each payload.
    fn put_batch(&self, domain: Domain, payloads: &[&[u8]]) -> StoreResult<Vec<ShareId>> {
        payloads.iter().map(|data| self.put(domain, data)).collect()
    }
}
