//! Graceful shutdown coordination: the `Running -> Draining -> Terminated`
//! state machine, the active-execution registry, and the abort/interrupt
//! path that lets in-flight executions save their state before stopping.

mod abort;
mod context;
mod controller;
mod marker;
mod state;

pub use abort::AbortSignal;
pub use context::RequestContext;
pub use controller::{LifecycleController, controller};
pub use marker::InterruptedMarker;
pub use state::LifecycleState;
