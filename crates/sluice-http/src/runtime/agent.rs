//! The narrow surface the run endpoint needs from a concrete agent, beyond
//! the lifecycle core's `AgentHandle`.
//!
//! `AgentHandle` only covers interrupt/persist; driving a multi-step
//! reasoning loop and checking in with a hook at each safe point is the
//! concrete agent's job (see `sluice-cli`'s demo agent).

use async_trait::async_trait;
use sluice_core::lifecycle::RequestContext;
use sluice_core::{AgentHandle, Hook, SessionStore, SessionStoreResult};
use std::sync::Arc;

use crate::runtime::error::RuntimeResult;

/// A concrete, runnable agent, as driven by the HTTP run endpoint.
#[async_trait]
pub trait RunnableAgent: AgentHandle {
    /// Run to completion, checking in with `hook` at each safe point.
    ///
    /// On an `Abort` outcome the implementation is expected to call
    /// `context.interrupt_and_save` itself and return a
    /// `RuntimeError::Aborted` built from the resulting `AbortSignal` — the
    /// core's abort path, not a silent early return.
    async fn run(
        &self,
        context: Arc<RequestContext>,
        hook: Arc<dyn Hook>,
        payload: serde_json::Value,
    ) -> RuntimeResult<serde_json::Value>;
}

/// Constructs a fresh `RunnableAgent` for each incoming request.
pub trait AgentFactory: Send + Sync {
    fn create(&self) -> Arc<dyn RunnableAgent>;
}

/// Lets a `RequestContext`, which only knows about `AgentHandle`, hold on to
/// a `RunnableAgent` without relying on trait-object upcasting.
pub(crate) struct AgentHandleAdapter(pub Arc<dyn RunnableAgent>);

#[async_trait]
impl AgentHandle for AgentHandleAdapter {
    async fn interrupt(&self) {
        self.0.interrupt().await
    }

    async fn serialize_to(&self, store: &dyn SessionStore) -> SessionStoreResult<()> {
        self.0.serialize_to(store).await
    }

    async fn load_from(&self, store: &dyn SessionStore) -> SessionStoreResult<()> {
        self.0.load_from(store).await
    }

    async fn load_if_exists(&self, store: &dyn SessionStore) -> SessionStoreResult<bool> {
        self.0.load_if_exists(store).await
    }
}
