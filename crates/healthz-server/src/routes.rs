//! Route configuration for the health endpoint.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::require_basic_auth;
use crate::handlers::healthz;
use crate::state::HealthzState;

/// Create the health endpoint router.
///
/// Every request, including unknown paths, must pass basic authentication.
/// Responses are logged at `INFO` with method, uri and status.
pub fn create_router(state: Arc<HealthzState>) -> Router {
    Router::new()
        .route(&state.config().path, get(healthz))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
