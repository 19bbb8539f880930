//! HTTP endpoint handlers.

pub mod health;
pub mod metrics;
pub mod run;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_endpoint;
pub use run::{RunRequest, RunResponse, run_agent};
