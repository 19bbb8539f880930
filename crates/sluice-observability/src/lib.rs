//! Telemetry for the lifecycle coordination core: Prometheus metrics,
//! structured tracing setup, and readiness/health aggregation.

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "tracing")]
pub mod trace;

#[cfg(feature = "health")]
pub mod health;

#[cfg(feature = "metrics")]
pub use metrics::{LifecycleMetrics, MetricsError};

#[cfg(feature = "tracing")]
pub use trace::init_tracing;

#[cfg(feature = "health")]
pub use health::{ComponentHealth, HealthChecker, HealthStatus, SystemHealth};

/// Observability configuration, assembled once at process startup.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Enable metrics collection.
    pub metrics_enabled: bool,
    /// Enable structured tracing.
    pub tracing_enabled: bool,
    /// Enable health/readiness checks.
    pub health_enabled: bool,
    /// Metrics namespace prefix.
    pub namespace: String,
    /// Log sampling configuration.
    pub log_sampling: LogSamplingConfig,
}

/// Log sampling rates, expressed as "1 in N".
#[derive(Debug, Clone, Copy)]
pub struct LogSamplingConfig {
    /// Sample rate for ERROR level (1 = no sampling).
    pub error_sample_rate: u32,
    /// Sample rate for WARN level (1 = no sampling).
    pub warn_sample_rate: u32,
    /// Sample rate for INFO level (100 = 1 in 100).
    pub info_sample_rate: u32,
    /// Sample rate for DEBUG level (1000 = 1 in 1000).
    pub debug_sample_rate: u32,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            tracing_enabled: true,
            health_enabled: true,
            namespace: "sluice".to_string(),
            log_sampling: LogSamplingConfig::default(),
        }
    }
}

impl Default for LogSamplingConfig {
    fn default() -> Self {
        Self {
            error_sample_rate: 1,
            warn_sample_rate: 1,
            info_sample_rate: 100,
            debug_sample_rate: 1000,
        }
    }
}

/// Initialize whichever telemetry subsystems `config` enables. Call once at
/// startup, before accepting traffic.
pub fn init_observability(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    #[cfg(feature = "metrics")]
    if config.metrics_enabled {
        metrics::init_metrics_registry(&config.namespace)?;
    }

    #[cfg(feature = "tracing")]
    if config.tracing_enabled {
        trace::init_tracing(&config)?;
    }

    Ok(())
}

/// Errors raised while wiring up telemetry.
#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("metrics initialization failed: {0}")]
    MetricsInit(String),

    #[error("tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("health check initialization failed: {0}")]
    HealthInit(String),

    #[cfg(feature = "metrics")]
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics::MetricsError),
}
