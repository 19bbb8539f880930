//! Graceful shutdown: waits for SIGTERM/SIGINT, then drains in-flight
//! executions before the process exits.

use sluice_core::LifecycleController;
use std::time::Duration;
use tokio::signal;
use tracing::info;

/// Waits for SIGINT (Ctrl+C, local dev) or SIGTERM (Kubernetes pod
/// termination), the same select used by the original signal-only handler.
async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received SIGINT, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("received SIGTERM, initiating graceful shutdown");
        },
    }
}

/// The future passed to `axum::serve(...).with_graceful_shutdown(...)`.
///
/// On signal, moves the controller to `Draining` and waits up to
/// `drain_deadline` for in-flight executions to finish before returning
/// control to Axum, which then stops accepting connections.
pub async fn shutdown_hook(controller: &'static LifecycleController, drain_deadline: Duration) {
    wait_for_signal().await;

    info!(?drain_deadline, "draining in-flight executions");
    let drained = controller.await_drain(drain_deadline).await;

    if drained {
        info!("all executions drained cleanly");
    } else {
        info!("drain deadline elapsed; proceeding with shutdown anyway");
    }
}
