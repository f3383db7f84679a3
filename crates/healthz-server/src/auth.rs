//! HTTP basic authentication.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{ServerError, ServerResult};
use crate::state::HealthzState;

/// Authorization scheme prefix for basic authentication.
const BASIC_PREFIX: &str = "Basic ";

/// The username and password a request must present.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks a presented pair against these credentials.
    ///
    /// Both fields are always compared, each in constant time.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (username_ok & password_ok).into()
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decodes an `Authorization: Basic <base64>` header value.
///
/// Returns `None` for other schemes, bad base64, non-UTF-8 payloads, or a
/// payload without a `:`. The password may itself contain `:`.
#[must_use]
pub fn parse_basic_authorization(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix(BASIC_PREFIX)?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware rejecting requests without the configured credentials.
///
/// # Errors
///
/// Returns [`ServerError::Unauthorized`], rendered as a 401 challenge.
pub async fn require_basic_auth(
    State(state): State<Arc<HealthzState>>,
    request: Request,
    next: Next,
) -> ServerResult<Response> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_authorization);

    match presented {
        Some((username, password)) if state.config().credentials.verify(&username, &password) => {
            Ok(next.run(request).await)
        }
        Some((username, _)) => {
            debug!(username = %username, uri = %request.uri(), "rejected credentials");
            Err(ServerError::Unauthorized)
        }
        None => {
            debug!(uri = %request.uri(), "missing basic credentials");
            Err(ServerError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_verify_exact_match() {
        let creds = BasicCredentials::new("admin", "s3cret");

        assert!(creds.verify("admin", "s3cret"));
        assert!(!creds.verify("admin", "wrong"));
        assert!(!creds.verify("root", "s3cret"));
        assert!(!creds.verify("admin", "s3cret "));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = BasicCredentials::new("admin", "s3cret");
        let debug = format!("{creds:?}");

        assert!(debug.contains("admin"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_parse_valid_header() {
        let header = encode("admin:s3cret");
        assert_eq!(
            parse_basic_authorization(&header),
            Some(("admin".to_string(), "s3cret".to_string()))
        );
    }

    #[test]
    fn test_parse_password_with_colon() {
        let header = encode("admin:pa:ss");
        assert_eq!(
            parse_basic_authorization(&header),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn test_parse_known_vector() {
        // "user:pass"
        assert_eq!(
            parse_basic_authorization("Basic dXNlcjpwYXNz"),
            Some(("user".to_string(), "pass".to_string()))
        );
    }

    #[test_case("Bearer dXNlcjpwYXNz" ; "bearer scheme")]
    #[test_case("Basic !!!not-base64!!!" ; "invalid base64")]
    #[test_case("Basic dXNlcnBhc3M=" ; "no colon")]
    #[test_case("" ; "empty header")]
    fn test_parse_rejects(header: &str) {
        assert_eq!(parse_basic_authorization(header), None);
    }
}
