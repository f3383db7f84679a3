//! Health endpoint server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::HealthzConfig;
use crate::error::{ServerError, ServerResult};
use crate::routes::create_router;
use crate::state::HealthzState;

/// HTTP server exposing the health endpoint.
#[derive(Debug, Clone)]
pub struct HealthzServer {
    state: Arc<HealthzState>,
}

impl HealthzServer {
    /// Create a new server from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the upstream
    /// client cannot be built.
    pub fn new(config: HealthzConfig) -> ServerResult<Self> {
        config.validate()?;
        let state = Arc::new(HealthzState::new(config)?);
        Ok(Self { state })
    }

    /// Get the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<HealthzState> {
        self.state.clone()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HealthzConfig {
        self.state.config()
    }

    /// Start the server and listen for connections.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self, addr: SocketAddr) -> ServerResult<()> {
        let listener = Self::bind(addr).await?;

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ServerResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = Self::bind(addr).await?;

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!("Health server shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    async fn bind(addr: SocketAddr) -> ServerResult<TcpListener> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr, e))?;

        let local = listener.local_addr().unwrap_or(addr);
        info!(addr = %local, "Health server listening");
        Ok(listener)
    }
}
