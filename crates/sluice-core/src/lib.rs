//! # sluice-core
//!
//! Core types for coordinating graceful shutdown across in-flight AI agent
//! executions: the lifecycle state machine, the active-execution registry,
//! the session-store contract, and the hook protocol agents check in with
//! at safe points.

pub mod agent_handle;
pub mod error;
pub mod identifiers;
pub mod lifecycle;
pub mod session_store;
pub mod tool;
pub mod validation;

pub use agent_handle::{AgentHandle, Hook, HookEvent, HookOutcome};
pub use error::{LifecycleError, LifecycleResult, SessionStoreError, SessionStoreResult};
pub use identifiers::{AgentId, RequestId, SessionId, ToolId};
pub use lifecycle::{AbortSignal, InterruptedMarker, LifecycleController, LifecycleState, controller};
pub use session_store::{SessionField, SessionStore, SessionStoreExt};
pub use tool::{StandardTool, ToolCall, ToolDispatch};
pub use validation::ValidationError;
