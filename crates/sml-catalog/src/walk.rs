//! Concurrent directory listing.
//!
//! The tree is scanned as a fan-out/fan-in over a [`JoinSet`]: each task reads
//! exactly one directory and hands back its files and subdirectories; the
//! collector merges the files and spawns one new task per subdirectory. The
//! collector owns the only result vector, so there is no shared counter to
//! keep in sync.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};

/// Files and subdirectories found directly inside one directory.
#[derive(Debug, Default)]
struct DirScan {
    files: Vec<String>,
    subdirs: Vec<PathBuf>,
}

/// List every regular file under `root`, relative to `root`, `/`-separated,
/// sorted.
///
/// An unreadable root is an error. An unreadable subdirectory is logged and
/// skipped; the rest of the tree is still returned.
pub async fn list_tree(root: &Path) -> CatalogResult<Vec<String>> {
    let root_error = |source: io::Error| CatalogError::Root {
        path: root.to_path_buf(),
        source,
    };
    let root = Arc::new(fs::canonicalize(root).await.map_err(root_error)?);
    let DirScan { files, subdirs } = scan_dir(&root, &root).await.map_err(root_error)?;
    Ok(collect_subtrees(&root, files, subdirs).await)
}

/// Scan `subdirs` and everything below them, adding what is found to
/// `files`. A subdirectory that cannot be read is logged and skipped.
async fn collect_subtrees(
    root: &Arc<PathBuf>,
    mut files: Vec<String>,
    subdirs: Vec<PathBuf>,
) -> Vec<String> {
    let mut tasks = JoinSet::new();
    for dir in subdirs {
        spawn_scan(&mut tasks, root, dir);
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(scan))) => {
                files.extend(scan.files);
                for dir in scan.subdirs {
                    spawn_scan(&mut tasks, root, dir);
                }
            }
            Ok((dir, Err(e))) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable catalog directory");
            }
            Err(e) => {
                warn!(error = %e, "catalog scan task failed");
            }
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "catalog listed");
    files
}

fn spawn_scan(
    tasks: &mut JoinSet<(PathBuf, io::Result<DirScan>)>,
    root: &Arc<PathBuf>,
    dir: PathBuf,
) {
    let root = Arc::clone(root);
    tasks.spawn(async move {
        let result = scan_dir(&root, &dir).await;
        (dir, result)
    });
}

async fn scan_dir(root: &Path, dir: &Path) -> io::Result<DirScan> {
    let mut entries = fs::read_dir(dir).await?;
    let mut scan = DirScan::default();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot stat catalog entry");
                continue;
            }
        };

        if file_type.is_dir() {
            scan.subdirs.push(path);
            continue;
        }
        if file_type.is_symlink() {
            // Follow links to files; never descend linked directories.
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    debug!(path = %path.display(), "not following symlinked directory");
                    continue;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "dangling symlink in catalog");
                    continue;
                }
            }
        } else if !file_type.is_file() {
            continue;
        }

        match relative_name(root, &path) {
            Some(name) => scan.files.push(name),
            None => debug!(path = %path.display(), "skipping non-UTF-8 catalog entry"),
        }
    }
    Ok(scan)
}

/// `path` relative to `root`, joined with `/` regardless of platform.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;
    Some(parts.join("/"))
}
