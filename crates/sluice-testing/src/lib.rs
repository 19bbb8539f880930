//! Test tooling shared across the workspace: `proptest` generators for
//! lifecycle event sequences, a minimal golden-file harness for wire
//! formats, and fixtures for exercising the controller without a real
//! agent behind it.

pub mod events;
pub mod fixtures;
pub mod golden;

pub use events::{LifecycleEvent, arb_event_sequence, arb_session_batch};
pub use fixtures::{NoopAgent, in_memory_store, noop_agent};
pub use golden::{GoldenError, assert_golden};
