//! Structured tracing setup.
//!
//! The lifecycle core logs directly via `tracing::info!`/`warn!` at
//! transition points (`LifecycleController`, `RequestContext`); this module
//! only wires up the process-wide subscriber those macros write through.

use crate::{LogSamplingConfig, ObservabilityConfig, ObservabilityError};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG` if set, otherwise defaults to `info`. Emits JSON lines
/// so log aggregators can index by field rather than parsing free text.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    let LogSamplingConfig {
        error_sample_rate,
        warn_sample_rate,
        info_sample_rate,
        debug_sample_rate,
    } = config.log_sampling;

    tracing::info!(
        namespace = %config.namespace,
        sampling.error = error_sample_rate,
        sampling.warn = warn_sample_rate,
        sampling.info = info_sample_rate,
        sampling.debug = debug_sample_rate,
        "initialized structured tracing"
    );

    Ok(())
}
