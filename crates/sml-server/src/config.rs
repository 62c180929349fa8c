use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::rate_limit::RateLimitConfig;

/// Default request body limit (5 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Server configuration.
///
/// Loaded from TOML; every field has a default, so a partial file (or none at
/// all) is valid. `PORT` and `BASEPAGE` in the environment override the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// URL prefix the whole app is mounted under, e.g. `/sosml`. Empty means
    /// the root.
    pub base_path: String,
    /// Take the client address for rate limiting from `X-Forwarded-For`.
    pub trust_proxy: bool,
    pub max_body_bytes: usize,
    pub features: FeatureFlags,
    pub paths: PathConfig,
    /// Rate limit applied to share uploads.
    pub share_limits: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3033)),
            base_path: String::new(),
            trust_proxy: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            features: FeatureFlags::default(),
            paths: PathConfig::default(),
            share_limits: RateLimitConfig::default(),
        }
    }
}

/// Administrative feature toggles. A disabled feature behaves as if its
/// routes did not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub serve_sharing: bool,
    pub serve_examples: bool,
    pub serve_wish_examples: bool,
    pub serve_frontend: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            serve_sharing: true,
            serve_examples: true,
            serve_wish_examples: true,
            serve_frontend: true,
        }
    }
}

/// Filesystem roots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub share_path: PathBuf,
    pub wishare_path: PathBuf,
    pub example_path: PathBuf,
    pub wish_path: PathBuf,
    pub frontend_path: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            share_path: PathBuf::from("shares"),
            wishare_path: PathBuf::from("wishares"),
            example_path: PathBuf::from("code"),
            wish_path: PathBuf::from("wishes"),
            frontend_path: PathBuf::from("frontend/build"),
        }
    }
}

impl ServerConfig {
    /// Load the configuration file (if any), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply `PORT` and `BASEPAGE` overrides from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid PORT {port:?}: {e}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(base) = lookup("BASEPAGE") {
            self.base_path = base;
        }
        Ok(())
    }

    /// The base path in mountable form (`/prefix`, no trailing slash), or
    /// `None` when the app is served at the root.
    pub fn mount_path(&self) -> Option<String> {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{trimmed}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:3033".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_body_bytes, 5 * 1024 * 1024);
        assert!(c.features.serve_sharing);
        assert!(c.features.serve_frontend);
        assert_eq!(c.paths.share_path, PathBuf::from("shares"));
        assert!(c.mount_path().is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:8080"

            [features]
            serve_sharing = false

            [paths]
            share_path = "/var/lib/sml/shares"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(!c.features.serve_sharing);
        assert!(c.features.serve_examples);
        assert_eq!(c.paths.share_path, PathBuf::from("/var/lib/sml/shares"));
        assert_eq!(c.paths.wishare_path, PathBuf::from("wishares"));
        assert_eq!(c.share_limits, RateLimitConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = ServerConfig::default();
        c.base_path = "/sosml".into();
        c.share_limits.max_requests = 7;
        let parsed = ServerConfig::from_toml_str(&c.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [("PORT", "4000"), ("BASEPAGE", "/play/")].into();
        let mut c = ServerConfig::default();
        c.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.bind_addr.port(), 4000);
        assert_eq!(c.mount_path().as_deref(), Some("/play"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut c = ServerConfig::default();
        let err = c
            .apply_env(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn root_base_path_mounts_nothing() {
        let mut c = ServerConfig::default();
        c.base_path = "/".into();
        assert!(c.mount_path().is_none());
    }
}
