use std::path::PathBuf;
use std::sync::Arc;

use sml_catalog::ExampleCatalog;
use sml_share::ShareService;
use sml_store::{FsContentStore, ShareRoots};
use sml_types::Domain;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::rate_limit::RateLimiter;

/// Where the SPA build lives and whether to serve it.
#[derive(Clone, Debug)]
pub struct Frontend {
    pub root: PathBuf,
    pub enabled: bool,
}

impl Frontend {
    pub fn index(&self) -> PathBuf {
        self.root.join("index.html")
    }
}

/// Shared state passed to all route handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub shares: ShareService,
    pub examples: ExampleCatalog,
    pub wishes: ExampleCatalog,
    pub frontend: Frontend,
    pub limiter: RateLimiter,
}

impl AppState {
    /// Build state from configuration, opening the share store on disk.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let features = config.features;
        let paths = &config.paths;

        let roots = ShareRoots::new(&paths.share_path, &paths.wishare_path);
        let store = FsContentStore::new(roots)?;

        Ok(Self {
            shares: ShareService::new(Arc::new(store), features.serve_sharing),
            examples: ExampleCatalog::new(&paths.example_path, "", features.serve_examples),
            wishes: ExampleCatalog::new(
                &paths.wish_path,
                Domain::Wish.extension(),
                features.serve_wish_examples,
            ),
            frontend: Frontend {
                root: paths.frontend_path.clone(),
                enabled: features.serve_frontend,
            },
            limiter: RateLimiter::new(config.share_limits, config.trust_proxy),
        })
    }
}
