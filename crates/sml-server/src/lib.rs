//! HTTP server for sml-share.
//!
//! Serves the share API (`/api/share/`, `/api/wishare/`), the read-only
//! example catalogs (`/api/list/`, `/api/code/*`, `/api/wishlist/`,
//! `/api/wish/*`), and the SPA frontend with client-side route fallback.
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → CompressionLayer → CorsLayer → DefaultBodyLimit, plus a
//! per-client rate limit on share uploads.
//!
//! All component errors map to HTTP responses via [`ApiError`].

pub mod config;
pub mod error;
pub mod frontend;
pub mod handler;
pub mod rate_limit;
pub mod router;
pub mod server;
pub mod state;

pub use config::{FeatureFlags, PathConfig, ServerConfig};
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use router::{build_router, RouterOptions};
pub use server::ShareServer;
pub use state::AppState;
