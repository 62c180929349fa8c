use std::collections::HashMap;
use std::sync::RwLock;

use sml_crypto::ContentHasher;
use sml_types::{Domain, ShareId};

use crate::error::StoreResult;
use crate::traits::ContentStore;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock` and
/// cloned on read.
pub struct InMemoryContentStore {
    entries: RwLock<HashMap<(Domain, ShareId), Vec<u8>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries across all domains.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, domain: Domain, data: &[u8]) -> StoreResult<ShareId> {
        let id = ContentHasher::hash(data);
        let mut map = self.entries.write().expect("lock poisoned");
        map.entry((domain, id.clone()))
            .or_insert_with(|| data.to_vec());
        Ok(id)
    }

    fn get(&self, domain: Domain, id: &ShareId) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(&(domain, id.clone())).cloned())
    }

    fn exists(&self, domain: Domain, id: &ShareId) -> StoreResult<bool> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.contains_key(&(domain, id.clone())))
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
