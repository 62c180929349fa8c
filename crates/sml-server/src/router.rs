use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::{middleware, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::frontend::{spa_fallback, static_router};
use crate::handler;
use crate::rate_limit::rate_limit;
use crate::state::AppState;

/// Router options that are not part of [`AppState`].
#[derive(Clone, Debug)]
pub struct RouterOptions {
    pub max_body_bytes: usize,
    /// Mount prefix (`/prefix`), or `None` for the root.
    pub mount_path: Option<String>,
}

/// The `/api` surface. Unmatched paths and wrong methods end in an empty 404.
pub fn api_router(state: &AppState) -> Router<AppState> {
    let uploads = Router::new()
        .route(
            "/share/",
            put(handler::submit_code).fallback(handler::method_fallback),
        )
        .route(
            "/wishare/",
            put(handler::submit_wish).fallback(handler::method_fallback),
        )
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit,
        ));

    Router::new()
        .merge(uploads)
        .route(
            "/share/:code",
            get(handler::retrieve_code).fallback(handler::method_fallback),
        )
        .route(
            "/wishare/:code",
            get(handler::retrieve_wish).fallback(handler::method_fallback),
        )
        .route(
            "/list/",
            get(handler::list_examples).fallback(handler::method_fallback),
        )
        .route(
            "/wishlist/",
            get(handler::list_wishes).fallback(handler::method_fallback),
        )
        .route(
            "/code/*code",
            get(handler::read_example).fallback(handler::method_fallback),
        )
        .route(
            "/wish/*code",
            get(handler::read_wish).fallback(handler::method_fallback),
        )
        .fallback(handler::api_fallback)
}

/// Build the full application router.
pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let app = Router::new()
        .nest("/api", api_router(&state))
        .merge(static_router(&state.frontend))
        .fallback(spa_fallback)
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match &options.mount_path {
        Some(prefix) => Router::new().nest(prefix, app),
        None => app,
    }
}
