//! Error types for the health endpoint.

use axum::http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Challenge sent with 401 responses.
pub const BASIC_AUTH_CHALLENGE: &str = r#"Basic realm="Restricted""#;

/// Result type alias for health endpoint operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving health checks.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration rejected at startup.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// Missing or wrong basic-auth credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The upstream request could not be completed.
    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus {
        /// HTTP status returned by the upstream.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The upstream body was larger than the client accepts.
    #[error("upstream body exceeds {limit} bytes")]
    UpstreamTooLarge {
        /// Largest body the client reads, in bytes.
        limit: usize,
    },

    /// The upstream body was not a rules response.
    #[error("{0}")]
    UpstreamDecode(String),

    /// The upstream reported a query error in its response envelope.
    #[error("upstream error ({error_type}): {message}")]
    UpstreamError {
        /// Error class reported by the upstream.
        error_type: String,
        /// Error message reported by the upstream.
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<healthz_rules::RulesError> for ServerError {
    fn from(err: healthz_rules::RulesError) -> Self {
        Self::UpstreamDecode(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, BASIC_AUTH_CHALLENGE)],
                "Unauthorized",
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                other.to_string(),
            )
                .into_response(),
        }
    }
}
