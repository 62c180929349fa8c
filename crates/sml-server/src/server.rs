use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, RouterOptions};
use crate::state::AppState;

/// sml-share HTTP server.
pub struct ShareServer {
    config: ServerConfig,
}

impl ShareServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing). Opens the share store.
    pub fn router(&self) -> ServerResult<Router> {
        let state = AppState::from_config(&self.config)?;
        let options = RouterOptions {
            max_body_bytes: self.config.max_body_bytes,
            mount_path: self.config.mount_path(),
        };
        Ok(build_router(state, &options))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        if let Some(prefix) = self.config.mount_path() {
            tracing::warn!(
                %prefix,
                "using a non-default base path; make sure URLs in the frontend build include it"
            );
        }
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("sml-share listening on {}", self.config.bind_addr);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
