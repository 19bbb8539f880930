//! Shared test doubles for exercising the lifecycle core without a real
//! reasoning-loop agent behind it.

use async_trait::async_trait;
use sluice_core::error::SessionStoreResult;
use sluice_core::{AgentHandle, SessionStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// An `AgentHandle` that does nothing but remember whether it was asked to
/// stop — enough to assert on in hook/controller tests without a real
/// reasoning loop.
#[derive(Default)]
pub struct NoopAgent {
    interrupted: AtomicBool,
}

impl NoopAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }
}

#[async_trait]
impl AgentHandle for NoopAgent {
    async fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
    }

    async fn serialize_to(&self, _store: &(dyn SessionStore)) -> SessionStoreResult<()> {
        Ok(())
    }

    async fn load_from(&self, _store: &(dyn SessionStore)) -> SessionStoreResult<()> {
        Ok(())
    }

    async fn load_if_exists(&self, _store: &(dyn SessionStore)) -> SessionStoreResult<bool> {
        Ok(false)
    }
}

/// Build an `Arc<dyn AgentHandle>` + `Arc<dyn SessionStore>` pair backed by
/// [`NoopAgent`] and an in-memory store, for tests that just need something
/// registerable with a `LifecycleController`.
pub fn noop_agent() -> Arc<NoopAgent> {
    Arc::new(NoopAgent::new())
}

pub fn in_memory_store() -> Arc<dyn SessionStore> {
    Arc::new(sluice_memory::InMemorySessionStore::new())
}
