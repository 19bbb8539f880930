//! # sluice
//!
//! Graceful shutdown coordination for AI agent serving: a `LifecycleController`
//! that tracks in-flight executions, drains them on shutdown, and lets a
//! running agent check in with a `Hook` at its reasoning/acting safe points
//! so it can be interrupted and resumed cleanly.
//!
//! ## Core components
//!
//! - [`LifecycleController`]: tracks in-flight executions and coordinates the
//!   `Running -> Draining -> Terminated` transition.
//! - [`AgentHandle`]/[`Hook`]: the narrow contract a running execution and its
//!   safe-point checks expose to the controller.
//! - [`SessionStore`]: where an interrupted execution's state and resume
//!   marker are persisted, with [`sluice_memory::InMemorySessionStore`] and
//!   (behind the `sqlite` feature) `SqliteSessionStore` as backends.
//! - `sluice_http`: the Axum boundary around the controller (run/resume
//!   endpoint, health, metrics, SSE abort streaming, the shutdown hook).
//!
//! ## Quick start
//!
//! ```rust
//! use sluice::core::{controller, SessionId};
//!
//! let controller = controller();
//! assert!(controller.is_accepting());
//! let _ = SessionId::generate();
//! ```

#[allow(ambiguous_glob_reexports)]
pub use sluice_core::*;
pub use sluice_memory::*;

#[allow(ambiguous_glob_reexports)]
pub use sluice_http::*;

#[cfg(feature = "testing")]
pub use sluice_testing::*;

#[cfg(feature = "observability")]
pub use sluice_observability::*;

// Module aliases matching the crate layout, for callers who prefer
// `sluice::core::SessionId` over the flattened re-export.
pub use sluice_core as core;
pub use sluice_memory as memory;
pub use sluice_http as http;

#[cfg(feature = "testing")]
pub use sluice_testing as testing;

#[cfg(feature = "observability")]
pub use sluice_observability as observability;
