//! `GET /metrics` — Prometheus text exposition.

use axum::http::StatusCode;
use sluice_observability::metrics::get_metrics_registry;

pub async fn metrics_endpoint() -> Result<String, (StatusCode, String)> {
    match get_metrics_registry() {
        Some(metrics) => {
            let encoder = prometheus::TextEncoder::new();
            let metric_families = metrics.prometheus_registry().gather();

            encoder.encode_to_string(&metric_families).map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to encode metrics: {e}"),
                )
            })
        }
        None => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "metrics registry not initialized".to_string(),
        )),
    }
}
