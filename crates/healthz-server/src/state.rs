//! Shared state for the health endpoint.

use std::sync::Arc;

use crate::config::HealthzConfig;
use crate::error::ServerResult;
use crate::upstream::RulesClient;

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct HealthzState {
    /// Endpoint configuration.
    config: Arc<HealthzConfig>,
    /// Upstream rules client.
    client: RulesClient,
}

impl HealthzState {
    /// Create the state, building the upstream client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: HealthzConfig) -> ServerResult<Self> {
        let client = RulesClient::new(config.rules_url(), config.upstream_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HealthzConfig {
        &self.config
    }

    /// Get the upstream rules client.
    #[must_use]
    pub fn client(&self) -> &RulesClient {
        &self.client
    }
}
