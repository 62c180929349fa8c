use std::io;
use std::path::{Path, PathBuf};

use sml_types::{CatalogKey, Gated};
use tokio::fs;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::walk::list_tree;

/// A read-only tree of example files behind a feature toggle.
#[derive(Clone, Debug)]
pub struct ExampleCatalog {
    root: PathBuf,
    /// Appended to the last key segment when reading (`".wish.json"` for
    /// wishes, empty for code examples).
    suffix: String,
    enabled: bool,
}

impl ExampleCatalog {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>, enabled: bool) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
            enabled,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// List every file in the catalog.
    pub async fn list(&self) -> CatalogResult<Gated<Vec<String>>> {
        if !self.enabled {
            return Ok(Gated::Disabled);
        }
        list_tree(&self.root).await.map(Gated::Served)
    }

    /// Read one file by client-supplied key.
    ///
    /// The key is validated before any path is built. The resolved path is
    /// then canonicalized and must stay inside the canonical root.
    pub async fn read(&self, key: &str) -> CatalogResult<Gated<Vec<u8>>> {
        if !self.enabled {
            return Ok(Gated::Disabled);
        }
        let key = CatalogKey::parse(key)?;
        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|source| CatalogError::Root {
                path: self.root.clone(),
                source,
            })?;

        let path = key.to_path(&root, &self.suffix);
        let resolved = match fs::canonicalize(&path).await {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(key));
            }
            Err(e) => return Err(e.into()),
        };
        if !resolved.starts_with(&root) {
            return Err(CatalogError::OutsideRoot(resolved));
        }
        if !fs::metadata(&resolved).await?.is_file() {
            return Err(CatalogError::NotFound(key));
        }

        debug!(%key, "reading catalog entry");
        match fs::read(&resolved).await {
            Ok(data) => Ok(Gated::Served(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CatalogError::NotFound(key)),
            Err(e) => Err(e.into()),
        }
    }
}
