//! The process-wide singleton coordinating registration, draining, and
//! shutdown for all in-flight agent executions.

use crate::error::{LifecycleError, LifecycleResult};
use crate::identifiers::{AgentId, SessionId};
use crate::lifecycle::context::RequestContext;
use crate::lifecycle::state::{AtomicLifecycleState, LifecycleState};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Concurrent registry of in-flight executions, keyed by session.
type ActiveTable = DashMap<SessionId, Arc<RequestContext>>;

/// Coordinates the `Running -> Draining -> Terminated` lifecycle shared by
/// every execution in the process.
pub struct LifecycleController {
    state: AtomicLifecycleState,
    active: ActiveTable,
    drain_notify: Notify,
}

impl LifecycleController {
    fn new() -> Self {
        Self {
            state: AtomicLifecycleState::default(),
            active: DashMap::new(),
            drain_notify: Notify::new(),
        }
    }

    /// Construct an isolated controller for unit/integration tests. The
    /// process-wide singleton returned by `controller()` is unaffected.
    #[doc(hidden)]
    pub fn new_for_test() -> Self {
        Self::new()
    }

    pub fn current_state(&self) -> LifecycleState {
        self.state.load()
    }

    /// Whether new executions should be accepted. `false` once draining has
    /// begun.
    pub fn is_accepting(&self) -> bool {
        self.current_state() == LifecycleState::Running
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Register a new execution. Rejects registration once draining has
    /// begun.
    ///
    /// Re-registering a session that is already active overwrites the
    /// existing entry and logs a warning rather than rejecting the call —
    /// the caller (not the controller) owns the decision about whether a
    /// duplicate in-flight request for the same session is a bug.
    pub fn register(&self, context: Arc<RequestContext>) -> LifecycleResult<()> {
        if !self.is_accepting() {
            return Err(LifecycleError::NotAccepting {
                state: self.current_state().as_str(),
            });
        }

        if self
            .active
            .insert(context.session_key.clone(), context.clone())
            .is_some()
        {
            warn!(
                session = %context.session_key,
                "overwriting an already-registered execution for this session"
            );
        }

        info!(session = %context.session_key, agent = %context.agent_id, "execution registered");
        Ok(())
    }

    /// Remove an execution from the active table. Wakes any `await_drain`
    /// waiter if this was the last active execution and draining has begun.
    pub fn unregister(&self, session_key: &SessionId) {
        if self.active.remove(session_key).is_some() {
            info!(session = %session_key, "execution unregistered");
        }
        if self.current_state() != LifecycleState::Running && self.active.is_empty() {
            self.drain_notify.notify_waiters();
        }
    }

    pub fn find_by_agent(&self, agent_id: &AgentId) -> Vec<Arc<RequestContext>> {
        self.active
            .iter()
            .filter(|entry| &entry.value().agent_id == agent_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Move to `Draining`. A no-op (returns `false`) if already draining or
    /// terminated.
    pub fn initiate_drain(&self) -> bool {
        let transitioned = self.state.advance_to(LifecycleState::Draining);
        if transitioned {
            info!(active = self.active.len(), "drain initiated");
            if self.active.is_empty() {
                self.drain_notify.notify_waiters();
            }
        }
        transitioned
    }

    /// Wait until the active table is empty or `deadline` elapses,
    /// whichever comes first, then move to `Terminated`.
    ///
    /// Returns `true` if draining completed naturally (table emptied before
    /// the deadline), `false` if the deadline was hit with executions still
    /// in flight. `Notify::notified()` is armed before the emptiness check
    /// so an `unregister` racing this call can't be missed between the two.
    ///
    /// If the deadline elapses with executions still active, each remaining
    /// context is force-checkpointed (`interrupt_and_save`) and the table is
    /// cleared before the state advances, so `Terminated` always implies an
    /// empty `ActiveTable`.
    pub async fn await_drain(&self, deadline: Duration) -> bool {
        self.initiate_drain();

        let drained = if self.active.is_empty() {
            true
        } else {
            let notified = self.drain_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active.is_empty() {
                true
            } else {
                tokio::time::timeout(deadline, notified).await.is_ok()
            }
        };

        if !drained {
            let remaining: Vec<Arc<RequestContext>> =
                self.active.iter().map(|entry| entry.value().clone()).collect();
            warn!(
                remaining = remaining.len(),
                "drain deadline elapsed; force-checkpointing remaining executions"
            );
            for ctx in &remaining {
                ctx.interrupt_and_save("drain deadline elapsed").await;
            }
            self.active.clear();
        }

        self.state.advance_to(LifecycleState::Terminated);
        drained
    }
}

static CONTROLLER: OnceLock<LifecycleController> = OnceLock::new();

/// The process-wide lifecycle controller.
pub fn controller() -> &'static LifecycleController {
    CONTROLLER.get_or_init(LifecycleController::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent_handle::AgentHandle;
    use crate::error::SessionStoreResult;
    use crate::session_store::{SessionField, SessionStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct NoopAgent;

    #[async_trait]
    impl AgentHandle for NoopAgent {
        async fn interrupt(&self) {}
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

    struct NoopStore(Mutex<()>);

    #[async_trait]
    impl SessionStore for NoopStore {
        async fn save_raw(&self, _key: &SessionId, _field: &SessionField, _raw: String) -> SessionStoreResult<()> {
            let _lock = self.0.lock().unwrap();
            Ok(())
        }
        async fn get_raw(&self, _key: &SessionId, _field: &SessionField) -> SessionStoreResult<Option<String>> {
            Ok(None)
        }
        async fn delete(&self, _key: &SessionId, _field: &SessionField) -> SessionStoreResult<()> {
            Ok(())
        }
        async fn exists(&self, _key: &SessionId) -> SessionStoreResult<bool> {
            Ok(false)
        }
    }

    fn test_context(session: &str, agent: &str) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(
            SessionId::parse(session).unwrap(),
            AgentId::parse(agent).unwrap(),
            Arc::new(NoopAgent),
            Arc::new(NoopStore(Mutex::new(()))),
        ))
    }

    #[test]
    fn register_and_unregister_track_active_count() {
        let controller = LifecycleController::new_for_test();
        let ctx = test_context("s1", "a1");
        controller.register(ctx.clone()).unwrap();
        assert_eq!(controller.active_count(), 1);
        controller.unregister(&ctx.session_key);
        assert_eq!(controller.active_count(), 0);
    }

    #[test]
    fn register_rejected_once_draining() {
        let controller = LifecycleController::new_for_test();
        controller.initiate_drain();
        let ctx = test_context("s1", "a1");
        let err = controller.register(ctx).unwrap_err();
        assert!(matches!(err, LifecycleError::NotAccepting { .. }));
    }

    #[test]
    fn find_by_agent_filters_correctly() {
        let controller = LifecycleController::new_for_test();
        controller.register(test_context("s1", "a1")).unwrap();
        controller.register(test_context("s2", "a1")).unwrap();
        controller.register(test_context("s3", "a2")).unwrap();

        let found = controller.find_by_agent(&AgentId::parse("a1").unwrap());
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn await_drain_returns_immediately_when_empty() {
        let controller = LifecycleController::new_for_test();
        let drained = controller.await_drain(Duration::from_millis(50)).await;
        assert!(drained);
        assert_eq!(controller.current_state(), LifecycleState::Terminated);
    }

    #[tokio::test]
    async fn await_drain_times_out_with_active_executions() {
        let controller = LifecycleController::new_for_test();
        controller.register(test_context("s1", "a1")).unwrap();
        let drained = controller.await_drain(Duration::from_millis(20)).await;
        assert!(!drained);
        assert_eq!(controller.current_state(), LifecycleState::Terminated);
        assert_eq!(controller.active_count(), 0, "Terminated must imply an empty ActiveTable");
    }

    #[tokio::test]
    async fn await_drain_completes_when_last_execution_unregisters() {
        let controller = Arc::new(LifecycleController::new_for_test());
        let ctx = test_context("s1", "a1");
        controller.register(ctx.clone()).unwrap();

        let waiter = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.await_drain(Duration::from_secs(5)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.unregister(&ctx.session_key);

        let drained = waiter.await.unwrap();
        assert!(drained);
    }
}
