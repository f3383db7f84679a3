//! Health endpoint configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::auth::BasicCredentials;
use crate::error::{ServerError, ServerResult};

/// Default listen address, in the `:port` form accepted on the command line.
pub const DEFAULT_LISTEN: &str = ":80";

/// Default path the health endpoint is served on.
pub const DEFAULT_PATH: &str = "/healthz";

/// Default label query selecting the rules that gate health.
pub const DEFAULT_QUERY: &str = "type=healthz";

/// Default upstream Prometheus address.
pub const DEFAULT_UPSTREAM_URI: &str = "http://127.0.0.1:9090";

/// Default timeout for one upstream rules fetch.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the health endpoint.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct HealthzConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// Path of the health endpoint.
    pub path: String,
    /// Label query selecting which rules gate health.
    pub query: String,
    /// Base URI of the upstream Prometheus server.
    pub upstream_uri: String,
    /// Timeout for one upstream fetch.
    pub upstream_timeout: Duration,
    /// Credentials required by basic authentication.
    pub credentials: BasicCredentials,
}

impl HealthzConfig {
    /// Create a configuration with default settings and the given credentials.
    #[must_use]
    pub fn new(credentials: BasicCredentials) -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 80),
            path: DEFAULT_PATH.to_string(),
            query: DEFAULT_QUERY.to_string(),
            upstream_uri: DEFAULT_UPSTREAM_URI.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            credentials,
        }
    }

    /// Set the bind address.
    #[must_use]
    pub const fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the endpoint path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the label query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the upstream URI. A trailing `/` is dropped.
    #[must_use]
    pub fn with_upstream_uri(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.upstream_uri = uri.trim_end_matches('/').to_string();
        self
    }

    /// Set the upstream fetch timeout.
    #[must_use]
    pub const fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Check that the configuration can be served.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidConfig`] for an unroutable path, an
    /// upstream URI without an http(s) scheme, empty credentials or a zero
    /// timeout.
    pub fn validate(&self) -> ServerResult<()> {
        validate_path(&self.path)?;
        if !(self.upstream_uri.starts_with("http://") || self.upstream_uri.starts_with("https://"))
        {
            return Err(ServerError::InvalidConfig {
                reason: format!("upstream uri must be http or https: {}", self.upstream_uri),
            });
        }
        if self.credentials.username().is_empty() || self.credentials.password().is_empty() {
            return Err(ServerError::InvalidConfig {
                reason: "username and password must not be empty".to_string(),
            });
        }
        if self.upstream_timeout.is_zero() {
            return Err(ServerError::InvalidConfig {
                reason: "upstream timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// URL of the upstream rules API.
    #[must_use]
    pub fn rules_url(&self) -> String {
        format!("{}/api/v1/rules", self.upstream_uri)
    }
}

/// Reject paths the router cannot register as a single static route.
///
/// The path must start with `/`, and no segment may start with `:` or `*`
/// or contain `{` or `}`.
fn validate_path(path: &str) -> ServerResult<()> {
    let invalid = |why: &str| ServerError::InvalidConfig {
        reason: format!("path {why}: {path}"),
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if path.contains(['{', '}']) {
        return Err(invalid("must not contain '{' or '}'"));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(invalid("segments must not start with ':' or '*'"));
    }
    Ok(())
}

/// Parse a listen address.
///
/// Accepts `:port` (all interfaces), a bare `port`, an IP `host:port`, or a
/// `hostname:port` resolved at startup (first address wins).
///
/// # Errors
///
/// Returns [`ServerError::InvalidConfig`] if the value is none of those or
/// the hostname does not resolve.
pub fn parse_listen_addr(value: &str) -> ServerResult<SocketAddr> {
    let invalid = || ServerError::InvalidConfig {
        reason: format!("invalid listen address: {value}"),
    };

    let port_only = value.strip_prefix(':').unwrap_or(value);
    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }

    if let Ok(addr) = value.parse() {
        return Ok(addr);
    }

    value
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}
