//! Command-line argument parsing with clap.
//!
//! Every flag can also be set through its `PROMETHEUS_HEALTHZ_*` environment
//! variable.

use std::time::Duration;

use clap::Parser;

use crate::auth::BasicCredentials;
use crate::config::{
    parse_listen_addr, HealthzConfig, DEFAULT_LISTEN, DEFAULT_PATH, DEFAULT_QUERY,
    DEFAULT_UPSTREAM_URI,
};
use crate::error::ServerResult;

/// Health endpoint reporting firing Prometheus alerting rules.
#[derive(Parser, Clone)]
#[command(name = "prometheus-healthz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to serve requests on (`:80`, `8080`, `ip:port` or `hostname:port`).
    #[arg(long, env = "PROMETHEUS_HEALTHZ_PORT", default_value = DEFAULT_LISTEN)]
    pub port: String,

    /// Path to serve the health check on.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_PATH", default_value = DEFAULT_PATH)]
    pub path: String,

    /// Label query (`key=value,...`) selecting the rules that gate health.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_QUERY", default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Prometheus endpoint.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_URI", default_value = DEFAULT_UPSTREAM_URI)]
    pub uri: String,

    /// Username required by basic authentication.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_USERNAME")]
    pub username: String,

    /// Password required by basic authentication.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "PROMETHEUS_HEALTHZ_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,
}

impl Cli {
    /// Build the immutable endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn into_config(self) -> ServerResult<HealthzConfig> {
        let bind_addr = parse_listen_addr(&self.port)?;
        let config = HealthzConfig::new(BasicCredentials::new(self.username, self.password))
            .with_bind_addr(bind_addr)
            .with_path(self.path)
            .with_query(self.query)
            .with_upstream_uri(self.uri)
            .with_upstream_timeout(Duration::from_secs(self.timeout));
        config.validate()?;
        Ok(config)
    }
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("port", &self.port)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}
