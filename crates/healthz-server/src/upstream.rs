//! Client for the upstream Prometheus rules API.

use std::time::Duration;

use healthz_rules::RulesResponse;
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// Largest upstream body read before the fetch is abandoned.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Fetches rule snapshots from `<uri>/api/v1/rules`.
///
/// One fetch per call; nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct RulesClient {
    http: reqwest::Client,
    rules_url: String,
    max_body_bytes: usize,
}

impl RulesClient {
    /// Create a client for the given rules URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::UpstreamRequest`] if the HTTP client cannot be built.
    pub fn new(rules_url: impl Into<String>, timeout: Duration) -> ServerResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            rules_url: rules_url.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Set the largest response body the client will read.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// The URL this client fetches.
    #[must_use]
    pub fn rules_url(&self) -> &str {
        &self.rules_url
    }

    /// Fetch the current rules snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or timeout, a non-2xx status, a
    /// body larger than the configured limit, a body that is not a rules
    /// response, or an upstream `error` envelope.
    pub async fn fetch_rules(&self) -> ServerResult<RulesResponse> {
        debug!(url = %self.rules_url, "fetching rules");

        let response = self.http.get(&self.rules_url).send().await?;
        let status = response.status();
        let body = self.read_body(response).await?;

        if !status.is_success() {
            return Err(ServerError::UpstreamStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        let snapshot = RulesResponse::from_json(&body)?;
        if !snapshot.is_success() {
            return Err(ServerError::UpstreamError {
                error_type: snapshot.error_type.unwrap_or_else(|| "unknown".to_string()),
                message: snapshot.error.unwrap_or_default(),
            });
        }

        debug!(groups = snapshot.groups().len(), "fetched rules");
        Ok(snapshot)
    }

    /// Read the body chunk by chunk, stopping once it passes the limit.
    async fn read_body(&self, mut response: reqwest::Response) -> ServerResult<Vec<u8>> {
        let limit = self.max_body_bytes;
        let too_large = || ServerError::UpstreamTooLarge { limit };

        let declared = response.content_length().unwrap_or(0);
        if declared > u64::try_from(limit).unwrap_or(u64::MAX) {
            return Err(too_large());
        }

        let mut body = Vec::with_capacity(usize::try_from(declared).unwrap_or(0));
        while let Some(chunk) = response.chunk().await? {
            if chunk.len() > limit - body.len() {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
