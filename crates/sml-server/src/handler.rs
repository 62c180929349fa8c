//! `/api` handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sml_catalog::ExampleCatalog;
use sml_types::{Domain, Gated};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Upload body for both share domains.
#[derive(Debug, Deserialize)]
pub struct SharePayload {
    pub code: String,
}

/// Catalog listing response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeList {
    pub codes: Vec<String>,
}

fn plain_text(body: impl Into<axum::body::Body>) -> Response {
    ([(CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

fn served<T>(gated: Gated<T>) -> ApiResult<T> {
    gated.served().ok_or(ApiError::Disabled)
}

/// Unwrap a path capture. A disabled feature wins over a malformed capture;
/// otherwise an undecodable capture is an empty 400 like any other bad key.
fn path_param(enabled: bool, path: Result<Path<String>, PathRejection>) -> ApiResult<String> {
    if !enabled {
        return Err(ApiError::Disabled);
    }
    path.map(|Path(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn submit(
    state: AppState,
    domain: Domain,
    body: Result<Json<SharePayload>, JsonRejection>,
) -> ApiResult<Response> {
    if !state.shares.is_enabled() {
        return Err(ApiError::Disabled);
    }
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let id = served(
        state
            .shares
            .submit(domain, Bytes::from(payload.code))
            .await?,
    )?;
    Ok(plain_text(id.to_string()))
}

async fn retrieve(state: AppState, domain: Domain, code: &str) -> ApiResult<Response> {
    let data = served(state.shares.retrieve(domain, code).await?)?;
    Ok(([(CONTENT_TYPE, TEXT_PLAIN), (CACHE_CONTROL, IMMUTABLE)], data).into_response())
}

/// `PUT /api/share/`
pub async fn submit_code(
    State(state): State<AppState>,
    body: Result<Json<SharePayload>, JsonRejection>,
) -> ApiResult<Response> {
    submit(state, Domain::Code, body).await
}

/// `PUT /api/wishare/`
pub async fn submit_wish(
    State(state): State<AppState>,
    body: Result<Json<SharePayload>, JsonRejection>,
) -> ApiResult<Response> {
    submit(state, Domain::Wish, body).await
}

/// `GET /api/share/:code`
pub async fn retrieve_code(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let code = path_param(state.shares.is_enabled(), code)?;
    retrieve(state, Domain::Code, &code).await
}

/// `GET /api/wishare/:code`
pub async fn retrieve_wish(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let code = path_param(state.shares.is_enabled(), code)?;
    retrieve(state, Domain::Wish, &code).await
}

async fn list(catalog: &ExampleCatalog) -> ApiResult<Json<CodeList>> {
    let codes = served(catalog.list().await?)?;
    debug!(root = %catalog.root().display(), count = codes.len(), "listing catalog");
    Ok(Json(CodeList { codes }))
}

/// `GET /api/list/`
pub async fn list_examples(State(state): State<AppState>) -> ApiResult<Json<CodeList>> {
    list(&state.examples).await
}

/// `GET /api/wishlist/`
pub async fn list_wishes(State(state): State<AppState>) -> ApiResult<Json<CodeList>> {
    list(&state.wishes).await
}

/// `GET /api/code/*code`
pub async fn read_example(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let code = path_param(state.examples.is_enabled(), code)?;
    Ok(plain_text(served(state.examples.read(&code).await?)?))
}

/// `GET /api/wish/*code`
pub async fn read_wish(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let code = path_param(state.wishes.is_enabled(), code)?;
    Ok(plain_text(served(state.wishes.read(&code).await?)?))
}

/// Catch-all for `/api`.
///
/// A share key with extra path segments (`/share/../../x`) never matches
/// `/share/:code`; it is still a share lookup with a malformed key, so it is
/// handed to the share flow and rejected there. Everything else is a 404.
pub async fn api_fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> ApiResult<Response> {
    if method == Method::GET {
        let path = uri.path();
        let path = path.strip_prefix("/api").unwrap_or(path);
        for domain in Domain::ALL {
            let nested = path
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(domain.as_str()))
                .and_then(|p| p.strip_prefix('/'))
                .filter(|rest| !rest.is_empty());
            if let Some(candidate) = nested {
                return retrieve(state, domain, candidate).await;
            }
        }
    }
    Err(ApiError::NotFound)
}

/// Wrong method on a known `/api` route falls through like an unknown route.
pub async fn method_fallback() -> ApiError {
    ApiError::NotFound
}
