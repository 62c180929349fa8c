use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sml_catalog::CatalogError;
use sml_share::ShareError;
use thiserror::Error;
use tracing::{error, warn};

/// Startup and serve failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] sml_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Request-level error. This is the only place component errors are turned
/// into status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed identifier or catalog key. Answered with an empty 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// The feature is switched off; answered exactly like an unknown route.
    #[error("feature disabled")]
    Disabled,

    #[error("rate limit exceeded")]
    RateLimited,

    /// Details are logged server-side and never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST.into_response(),
            ApiError::NotFound | ApiError::Disabled => StatusCode::NOT_FOUND.into_response(),
            ApiError::RateLimited => error_body(
                StatusCode::TOO_MANY_REQUESTS,
                "too many requests, please try again later",
            ),
            ApiError::Internal(_) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

impl From<ShareError> for ApiError {
    fn from(e: ShareError) -> Self {
        match e {
            ShareError::BadIdentifier(e) => ApiError::BadRequest(e.to_string()),
            ShareError::NotFound { .. } => ApiError::NotFound,
            // Already logged by the share service.
            ShareError::Storage(_) | ShareError::Join(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::BadKey(e) => ApiError::BadRequest(e.to_string()),
            CatalogError::NotFound(_) => ApiError::NotFound,
            CatalogError::OutsideRoot(ref path) => {
                warn!(path = %path.display(), "catalog entry resolves outside its root");
                ApiError::NotFound
            }
            CatalogError::Root { .. } | CatalogError::Io(_) => {
                error!(error = %e, "catalog I/O failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sml_types::{CatalogKey, Domain, ShareId, TypeError};

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).into_response().status(), 400);
        assert_eq!(ApiError::NotFound.into_response().status(), 404);
        assert_eq!(ApiError::Disabled.into_response().status(), 404);
        assert_eq!(ApiError::RateLimited.into_response().status(), 429);
        assert_eq!(ApiError::Internal("disk".into()).into_response().status(), 500);
    }

    #[test]
    fn share_errors_map() {
        let bad = ShareError::BadIdentifier(TypeError::InvalidIdentifier("..".into()));
        assert!(matches!(ApiError::from(bad), ApiError::BadRequest(_)));
        let missing = ShareError::NotFound {
            domain: Domain::Code,
            id: ShareId::parse("abc").unwrap(),
        };
        assert!(matches!(ApiError::from(missing), ApiError::NotFound));
        let io = ShareError::Storage(std::io::Error::other("boom").into());
        assert!(matches!(ApiError::from(io), ApiError::Internal(_)));
    }

    #[test]
    fn catalog_errors_map() {
        let missing = CatalogError::NotFound(CatalogKey::parse("a/b").unwrap());
        assert!(matches!(ApiError::from(missing), ApiError::NotFound));
        let escaped = CatalogError::OutsideRoot("/etc/passwd".into());
        assert!(matches!(ApiError::from(escaped), ApiError::NotFound));
        let io = CatalogError::Io(std::io::Error::other("boom"));
        assert!(matches!(ApiError::from(io), ApiError::Internal(_)));
    }
}
