//! HTTP router: the run endpoint plus health and metrics.

use axum::{Router, middleware, routing::{get, post}};
use tower_http::trace::TraceLayer;

use crate::runtime::AppState;
use crate::runtime::error::request_id_middleware;
use crate::runtime::handlers::{health_check, metrics_endpoint, readiness_check, run_agent};

/// Build the Axum router for `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/agent/run", post(run_agent))
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
