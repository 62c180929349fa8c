use std::sync::Arc;

use bytes::Bytes;
use sml_store::ContentStore;
use sml_types::{Domain, Gated, ShareId};
use tracing::{debug, error};

use crate::error::{ShareError, ShareResult};

/// Submit/retrieve flows for both content domains.
#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn ContentStore>,
    enabled: bool,
}

impl ShareService {
    pub fn new(store: Arc<dyn ContentStore>, enabled: bool) -> Self {
        Self { store, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hash and store `payload`, returning its identifier.
    ///
    /// Hashing and the write run on the blocking pool. A spawned blocking
    /// task runs to completion even if the caller is dropped, so a client
    /// disconnect never interrupts a write halfway.
    pub async fn submit(&self, domain: Domain, payload: Bytes) -> ShareResult<Gated<ShareId>> {
        if !self.enabled {
            return Ok(Gated::Disabled);
        }
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.put(domain, &payload)).await;
        let id = flatten(domain, result)?;
        debug!(hash = %id, %domain, "share submitted");
        Ok(Gated::Served(id))
    }

    /// Look up a stored payload by client-supplied identifier.
    pub async fn retrieve(&self, domain: Domain, candidate: &str) -> ShareResult<Gated<Vec<u8>>> {
        if !self.enabled {
            return Ok(Gated::Disabled);
        }
        let id = ShareId::parse(candidate)?;
        let store = Arc::clone(&self.store);
        let lookup = id.clone();
        let result = tokio::task::spawn_blocking(move || store.get(domain, &lookup)).await;
        match flatten(domain, result)? {
            Some(data) => Ok(Gated::Served(data)),
            None => Err(ShareError::NotFound { domain, id }),
        }
    }
}

/// Collapse a blocking-task result, logging storage failures.
fn flatten<T>(
    domain: Domain,
    result: Result<sml_store::StoreResult<T>, tokio::task::JoinError>,
) -> ShareResult<T> {
    let err = match result {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => ShareError::Storage(e),
        Err(e) => ShareError::Join(e),
    };
    error!(%domain, error = %err, "share storage failed");
    Err(err)
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
