//! `GET /health` and `GET /health/ready`.

use axum::{extract::State, http::StatusCode, response::Json};
use sluice_observability::health::{ComponentHealth, SystemHealth};
use std::collections::HashMap;

use crate::runtime::AppState;

/// Basic liveness check: the process is up and answering requests.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "sluice-http",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check: healthy only while the controller is still accepting
/// new executions. A draining or terminated controller reports unhealthy
/// so a load balancer stops routing traffic to this instance.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<SystemHealth>, (StatusCode, Json<SystemHealth>)> {
    let mut components = HashMap::new();
    let lifecycle = if state.controller.is_accepting() {
        ComponentHealth::healthy("lifecycle".to_string())
    } else {
        ComponentHealth::unhealthy(
            "lifecycle".to_string(),
            format!(
                "controller is {} ({} active executions)",
                state.controller.current_state(),
                state.controller.active_count()
            ),
        )
    };
    components.insert("lifecycle".to_string(), lifecycle);

    let system_health = SystemHealth::from_components(components);

    if system_health.status.is_healthy() {
        Ok(Json(system_health))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(system_health)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let body = health_check().await.0;
        assert_eq!(body["status"], "healthy");
    }
}
