//! HTTP boundary for the sluice lifecycle core.
//!
//! Wires the `LifecycleController` to an Axum service: a single run/resume
//! endpoint gated on `is_accepting()`, health and metrics endpoints, the SSE
//! abort-signal stream, and the shutdown hook that drives the drain on
//! SIGTERM/SIGINT.

pub mod runtime;

pub use runtime::*;
