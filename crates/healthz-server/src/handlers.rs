//! HTTP request handlers for the health endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use healthz_rules::{filter_firing_rules, HealthResponse, HealthVerdict};
use tracing::{debug, error, warn};

use crate::error::ServerResult;
use crate::state::HealthzState;

/// Handle GET on the health path.
///
/// Fetches the current rules, selects the firing ones matching the
/// configured query and reports the verdict.
///
/// # Errors
///
/// Upstream failures are returned as-is and rendered as a plain-text 500.
pub async fn healthz(State(state): State<Arc<HealthzState>>) -> ServerResult<Response> {
    let snapshot = state.client().fetch_rules().await.inspect_err(|e| {
        error!(error = %e, "failed to fetch rules");
    })?;

    let firing = filter_firing_rules(&state.config().query, &snapshot);
    let verdict = HealthVerdict::from_rules(firing);

    if verdict.is_healthy() {
        debug!(query = %state.config().query, "healthy");
    } else {
        warn!(query = %state.config().query, rules = ?verdict.rules(), "unhealthy");
    }

    Ok(verdict_response(verdict))
}

/// Render a verdict: 200 when healthy, 500 listing the rules otherwise.
pub fn verdict_response(verdict: HealthVerdict) -> Response {
    let status = if verdict.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(HealthResponse::from(verdict))).into_response()
}
