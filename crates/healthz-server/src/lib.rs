//! # healthz-server
//!
//! HTTP health endpoint backed by Prometheus alerting rules.
//!
//! Each request fetches the current rules from the upstream
//! `/api/v1/rules` API, selects the rules whose labels match the configured
//! query and reports whether any of them is firing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use healthz_server::{BasicCredentials, HealthzConfig, HealthzServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), healthz_server::ServerError> {
//!     let config = HealthzConfig::new(BasicCredentials::new("admin", "s3cret"))
//!         .with_query("type=healthz")
//!         .with_upstream_uri("http://127.0.0.1:9090");
//!
//!     let server = HealthzServer::new(config)?;
//!     server.serve(server.config().bind_addr).await
//! }
//! ```
//!
//! ## Responses
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | No matching firing rules | 200 | `{"state":"healthy","rules":null}` |
//! | Matching firing rules | 500 | `{"state":"unhealthy","rules":[...]}` |
//! | Upstream failure | 500 | plain-text error message |
//! | Missing or wrong credentials | 401 | basic-auth challenge |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod upstream;

// Re-export main types
pub use auth::BasicCredentials;
pub use cli::Cli;
pub use config::HealthzConfig;
pub use error::{ServerError, ServerResult};
pub use server::HealthzServer;
pub use state::HealthzState;
pub use upstream::RulesClient;
