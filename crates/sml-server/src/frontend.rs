//! SPA frontend hosting.
//!
//! `/static/*` is served from the build's `static/` directory with
//! precompressed variants and a one-year cache lifetime. Any other path that
//! does not look like an asset is a client-side route and gets the entry
//! document; asset paths are served from the build root.

use std::convert::Infallible;

use axum::extract::{Request, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, Frontend};

const ASSET_EXTENSIONS: [&str; 4] = [".js", ".json", ".html", ".png"];
const STATIC_CACHE: &str = "public, max-age=31536000";

/// Returns `true` if `path` names a build asset rather than a client route.
pub fn is_asset_path(path: &str) -> bool {
    ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Router for `/static`, or an empty router if the frontend is disabled.
pub fn static_router(frontend: &Frontend) -> Router<AppState> {
    if !frontend.enabled {
        return Router::new();
    }
    let assets = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE),
        ))
        .service(
            ServeDir::new(frontend.root.join("static"))
                .precompressed_br()
                .precompressed_gzip(),
        );
    Router::new().nest_service("/static", assets)
}

/// Fallback for everything outside `/api` and `/static`.
pub async fn spa_fallback(State(state): State<AppState>, request: Request) -> Response {
    let frontend = &state.frontend;
    if !frontend.enabled {
        return ApiError::Disabled.into_response();
    }
    let path = request.uri().path().to_owned();
    if is_asset_path(&path) {
        debug!(%path, "serving frontend asset");
        into_response(ServeDir::new(&frontend.root).oneshot(request).await)
    } else {
        debug!(%path, "forwarding to frontend entry document");
        into_response(ServeFile::new(frontend.index()).oneshot(request).await)
    }
}

fn into_response<R: IntoResponse>(result: Result<R, Infallible>) -> Response {
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
