//! Filesystem-backed content store.
//!
//! Layout (one flat directory per domain):
//! ```text
//! {code_root}/
//! ├── 3f1c...e9.sml
//! └── a07b...42.sml
//! {wish_root}/
//! └── 9d2e...17.wish.json
//! ```
//!
//! Writes land in a `.tmp-*` file inside the same root, are synced, and are
//! then renamed onto the final name. Readers only ever look up final names,
//! so an interrupted write is never visible.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sml_crypto::ContentHasher;
use sml_types::{Domain, ShareId};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

const TEMP_PREFIX: &str = ".tmp-";

/// Storage roots, one per domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRoots {
    pub code: PathBuf,
    pub wish: PathBuf,
}

impl ShareRoots {
    pub fn new(code: impl Into<PathBuf>, wish: impl Into<PathBuf>) -> Self {
        Self {
            code: code.into(),
            wish: wish.into(),
        }
    }

    pub fn root(&self, domain: Domain) -> &Path {
        match domain {
            Domain::Code => &self.code,
            Domain::Wish => &self.wish,
        }
    }
}

/// Filesystem content store.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    /// Canonicalized roots.
    roots: ShareRoots,
}

impl FsContentStore {
    /// Open a store over `roots`, creating missing directories.
    ///
    /// Roots are canonicalized once here; every entry path is later checked
    /// against the canonical form.
    pub fn new(roots: ShareRoots) -> StoreResult<Self> {
        Ok(Self {
            roots: ShareRoots {
                code: open_root(&roots.code)?,
                wish: open_root(&roots.wish)?,
            },
        })
    }

    /// The canonical roots this store writes to.
    pub fn roots(&self) -> &ShareRoots {
        &self.roots
    }

    /// Map a validated identifier to its entry path.
    ///
    /// The result is always a direct child of the domain root; anything else
    /// is reported as [`StoreError::OutsideRoot`].
    pub fn entry_path(&self, domain: Domain, id: &ShareId) -> StoreResult<PathBuf> {
        let root = self.roots.root(domain);
        let path = root.join(format!("{id}{}", domain.extension()));
        if path.parent() != Some(root) {
            return Err(StoreError::OutsideRoot { domain, path });
        }
        Ok(path)
    }

    fn write_entry(&self, domain: Domain, path: &Path, data: &[u8]) -> StoreResult<()> {
        let root = self.roots.root(domain);
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        // A concurrent identical upload may have won the race; renaming
        // identical bytes over it is harmless.
        tmp.persist(path).map_err(|e| StoreError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        sync_dir(root)?;
        Ok(())
    }
}

fn open_root(root: &Path) -> StoreResult<PathBuf> {
    fs::create_dir_all(root)?;
    Ok(fs::canonicalize(root)?)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl ContentStore for FsContentStore {
    fn put(&self, domain: Domain, data: &[u8]) -> StoreResult<ShareId> {
        let id = ContentHasher::hash(data);
        let path = self.entry_path(domain, &id)?;
        if path.try_exists()? {
            debug!(hash = %id, %domain, "share already stored");
            return Ok(id);
        }
        self.write_entry(domain, &path, data)?;
        info!(hash = %id, %domain, bytes = data.len(), "share stored");
        Ok(id)
    }

    fn get(&self, domain: Domain, id: &ShareId) -> StoreResult<Option<Vec<u8>>> {
        let path = self.entry_path(domain, id)?;
        let resolved = match fs::canonicalize(&path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !resolved.starts_with(self.roots.root(domain)) {
            return Err(StoreError::OutsideRoot {
                domain,
                path: resolved,
            });
        }
        match fs::read(&resolved) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, domain: Domain, id: &ShareId) -> StoreResult<bool> {
        Ok(self.entry_path(domain, id)?.try_exists()?)
    }
}
