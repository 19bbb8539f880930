//! Prometheus metrics for the lifecycle coordination core.
//!
//! Deliberately small: the core only exposes what an operator needs to
//! watch a rolling deployment drain — how many executions are active, and
//! how often the drain deadline forced a checkpoint before an execution
//! finished on its own.

use prometheus::{Gauge, IntCounter, Opts, Registry, register_gauge, register_int_counter};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

static METRICS_REGISTRY: OnceLock<Arc<LifecycleMetrics>> = OnceLock::new();

/// The metrics the lifecycle core publishes.
#[derive(Debug)]
pub struct LifecycleMetrics {
    /// Current number of in-flight executions (`ActiveTable` size).
    pub active_executions: Gauge,
    /// Total executions that hit the drain deadline before finishing on
    /// their own and had to be force-checkpointed.
    pub force_checkpoints_total: IntCounter,
    registry: Registry,
}

impl LifecycleMetrics {
    fn new(namespace: &str) -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let active_executions = register_gauge!(Opts::new(
            format!("{namespace}_active_executions"),
            "Number of agent executions currently registered with the lifecycle controller"
        ))?;
        registry.register(Box::new(active_executions.clone()))?;

        let force_checkpoints_total = register_int_counter!(Opts::new(
            format!("{namespace}_force_checkpoints_total"),
            "Total executions force-checkpointed because the drain deadline elapsed"
        ))?;
        registry.register(Box::new(force_checkpoints_total.clone()))?;

        Ok(Self {
            active_executions,
            force_checkpoints_total,
            registry,
        })
    }

    pub fn prometheus_registry(&self) -> &Registry {
        &self.registry
    }
}

/// Initialize the process-wide metrics registry. Call once at startup.
pub fn init_metrics_registry(namespace: &str) -> Result<(), MetricsError> {
    let metrics = Arc::new(LifecycleMetrics::new(namespace)?);
    METRICS_REGISTRY
        .set(metrics)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn get_metrics_registry() -> Option<Arc<LifecycleMetrics>> {
    METRICS_REGISTRY.get().cloned()
}

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics registry already initialized")]
    AlreadyInitialized,

    #[error("metrics registry not initialized")]
    NotInitialized,
}
