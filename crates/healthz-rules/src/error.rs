//! Error types for the healthz-rules crate.

use thiserror::Error;

/// Errors that can occur while handling a rules snapshot.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The snapshot body could not be decoded.
    #[error("failed to decode rules response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for RulesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type for rules operations.
pub type Result<T> = std::result::Result<T, RulesError>;
