//! Per-client fixed-window rate limiting for share uploads.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderValue, RETRY_AFTER};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

/// Buckets are swept for expired windows once the map grows past this.
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limiter configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window duration in seconds.
    pub window_secs: u64,
    /// Maximum requests per client per window.
    pub max_requests: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone)]
struct BucketState {
    count: u64,
    window_start: Instant,
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    trust_proxy: bool,
    buckets: Arc<RwLock<HashMap<String, BucketState>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, trust_proxy: bool) -> Self {
        Self {
            config,
            trust_proxy,
            buckets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request from `key`. Returns the time until the window resets
    /// if the client is over its limit.
    pub fn check(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let window = self.config.window();
        let mut buckets = self.buckets.write().expect("rate limit lock poisoned");

        if buckets.len() > PRUNE_THRESHOLD {
            buckets.retain(|_, b| now.duration_since(b.window_start) < window);
        }

        let bucket = buckets.entry(key.to_string()).or_insert(BucketState {
            count: 0,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        if bucket.count >= self.config.max_requests {
            Err(window.saturating_sub(now.duration_since(bucket.window_start)))
        } else {
            bucket.count += 1;
            Ok(())
        }
    }

    /// The key a request is counted under: the first `X-Forwarded-For` hop
    /// when behind a trusted proxy, otherwise the peer address.
    pub fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy {
            let forwarded = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(client) = forwarded {
                return client.to_string();
            }
        }
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Middleware that enforces the per-client limit.
pub async fn rate_limit(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let key = limiter.client_key(&request);
    if let Err(retry_after) = limiter.check(&key, Instant::now()) {
        warn!(client = %key, "share rate limit exceeded");
        let mut response = ApiError::RateLimited.into_response();
        let secs = retry_after.as_secs().max(1);
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        return response;
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    fn limiter(max: u64) -> RateLimiter {
        RateLimiter::new(
            RateLimitConfig {
                window_secs: 60,
                max_requests: max,
            },
            true,
        )
    }

    #[test]
    fn allows_up_to_max() {
        let l = limiter(3);
        let now = Instant::now();
        assert!(l.check("a", now).is_ok());
        assert!(l.check("a", now).is_ok());
        assert!(l.check("a", now).is_ok());
        assert!(l.check("a", now).is_err());
    }

    #[test]
    fn clients_are_independent() {
        let l = limiter(1);
        let now = Instant::now();
        assert!(l.check("a", now).is_ok());
        assert!(l.check("b", now).is_ok());
        assert!(l.check("a", now).is_err());
    }

    #[test]
    fn window_resets() {
        let l = limiter(1);
        let start = Instant::now();
        assert!(l.check("a", start).is_ok());
        let retry = l.check("a", start + Duration::from_secs(10)).unwrap_err();
        assert_eq!(retry, Duration::from_secs(50));
        assert!(l.check("a", start + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn forwarded_for_first_hop() {
        let l = limiter(1);
        let req = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(l.client_key(&req), "203.0.113.7");
    }

    #[test]
    fn untrusted_proxy_header_is_ignored() {
        let l = RateLimiter::new(RateLimitConfig::default(), false);
        let mut req = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(l.client_key(&req), "unknown");
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 5555))));
        assert_eq!(l.client_key(&req), "192.0.2.1");
    }
}
