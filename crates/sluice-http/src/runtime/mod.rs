//! The HTTP boundary around the lifecycle core: shared request state,
//! configuration, errors, the run/health/metrics handlers, the router, the
//! shutdown hook, and the SSE streaming types.

pub mod agent;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hook;
pub mod router;
pub mod shutdown;
pub mod streaming;

pub use agent::{AgentFactory, RunnableAgent};
pub use config::{ConfigError, RuntimeConfig};
pub use error::{ErrorResponse, RequestIdExtension, RuntimeError, RuntimeResult};
pub use hook::AgentAbortHook;
pub use router::build_router;
pub use shutdown::shutdown_hook;
pub use streaming::{AgentUpdate, StreamingAgentExecutor, create_sse_stream};

use sluice_core::{AgentId, LifecycleController, SessionStore, controller};
use std::sync::Arc;

/// Shared state behind every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub controller: &'static LifecycleController,
    pub store: Arc<dyn SessionStore>,
    pub agent_factory: Arc<dyn AgentFactory>,
    pub agent_id: AgentId,
    pub config: RuntimeConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        agent_factory: Arc<dyn AgentFactory>,
        agent_id: AgentId,
        config: RuntimeConfig,
    ) -> Self {
        Self::with_controller(controller(), store, agent_factory, agent_id, config)
    }

    /// Like [`AppState::new`], but against an explicit controller rather
    /// than the process-wide singleton. Production wiring should go through
    /// `new`; this exists so integration tests can hold an isolated
    /// controller instead of racing other tests against the shared one.
    pub fn with_controller(
        controller: &'static LifecycleController,
        store: Arc<dyn SessionStore>,
        agent_factory: Arc<dyn AgentFactory>,
        agent_id: AgentId,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            controller,
            store,
            agent_factory,
            agent_id,
            config,
        }
    }

    pub fn router(self) -> axum::Router {
        build_router(self)
    }
}
