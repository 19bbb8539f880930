//! The hook a running agent checks in with at each safe point.
//!
//! Tells the agent to abort once the controller starts draining. Lazily
//! registers the execution with the controller on the agent's first
//! reasoning step, rather than on request arrival. On that same first
//! reasoning step, if the session has an interrupted marker on record, it
//! appends (never prepends) a resume notice to the message list, deletes
//! the marker, and marks the session resumed so the notice is injected at
//! most once. `complete()` deletes any remaining marker and serializes the
//! agent's final state, so a normally-completed session never leaves a
//! stale marker behind.

use async_trait::async_trait;
use sluice_core::lifecycle::RequestContext;
use sluice_core::{
    Hook, HookEvent, HookOutcome, InterruptedMarker, LifecycleController, SessionField,
    SessionStoreExt,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

pub struct AgentAbortHook {
    controller: &'static LifecycleController,
    context: Arc<RequestContext>,
    registered: AtomicBool,
    resumed: AtomicBool,
}

impl AgentAbortHook {
    pub fn new(controller: &'static LifecycleController, context: Arc<RequestContext>) -> Self {
        Self {
            controller,
            context,
            registered: AtomicBool::new(false),
            resumed: AtomicBool::new(false),
        }
    }

    /// Register the execution on the first reasoning step, not before.
    /// Returns `false` if registration failed (controller stopped
    /// accepting between the handler's own check and this step).
    async fn register_if_first(&self) -> bool {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return true;
        }

        if let Err(e) = self.controller.register(self.context.clone()) {
            warn!(session = %self.context.session_key, error = %e, "failed to register execution on first reasoning step");
            return false;
        }
        true
    }

    /// Inject the resume notice (once) if an interrupted marker is on
    /// record, then delete the marker so a future resume doesn't see it
    /// again.
    async fn apply_resume_if_needed(&self, messages: &mut Vec<String>) {
        if self.resumed.load(Ordering::Acquire) {
            return;
        }

        let marker_field = SessionField::interrupted_marker();
        let store = self.context.store();
        match store
            .get::<InterruptedMarker>(&self.context.session_key, &marker_field)
            .await
        {
            Ok(Some(marker)) => {
                messages.push(format!(
                    "execution resumed after interruption ({}) at {}",
                    marker.reason, marker.interrupted_at
                ));
                if let Err(e) = store.delete(&self.context.session_key, &marker_field).await {
                    warn!(session = %self.context.session_key, error = %e, "failed to delete interrupted marker after resume");
                }
                self.resumed.store(true, Ordering::Release);
            }
            Ok(None) => {
                self.resumed.store(true, Ordering::Release);
            }
            Err(e) => {
                warn!(session = %self.context.session_key, error = %e, "failed to check resume marker");
            }
        }
    }
}

#[async_trait]
impl Hook for AgentAbortHook {
    async fn on_event(&self, event: &mut HookEvent<'_>) -> HookOutcome {
        if !self.controller.is_accepting() {
            return HookOutcome::Abort;
        }

        if let HookEvent::PreReasoning { messages } = event {
            if !self.register_if_first().await {
                return HookOutcome::Abort;
            }
            self.apply_resume_if_needed(messages).await;
        }

        HookOutcome::Continue
    }

    /// Delete the interrupted marker (a no-op if already cleared on
    /// resume) and persist the agent's final state.
    async fn complete(&self) {
        let marker_field = SessionField::interrupted_marker();
        if let Err(e) = self
            .context
            .store()
            .delete(&self.context.session_key, &marker_field)
            .await
        {
            warn!(session = %self.context.session_key, error = %e, "failed to delete interrupted marker on completion");
        }

        if let Err(e) = self.context.serialize_state().await {
            warn!(session = %self.context.session_key, error = %e, "failed to serialize agent state on completion");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::{AgentHandle, AgentId, SessionId, SessionStore, SessionStoreResult};
    use sluice_memory::InMemorySessionStore;

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

    fn test_context(store: Arc<dyn SessionStore>) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(
            SessionId::generate(),
            AgentId::parse("test-agent").unwrap(),
            Arc::new(NoopAgent),
            store,
        ))
    }

    #[tokio::test]
    async fn aborts_once_controller_is_draining() {
        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));
        controller.initiate_drain();

        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let context = test_context(store);
        let hook = AgentAbortHook::new(controller, context);

        let mut messages = vec!["hi".to_string()];
        let mut event = HookEvent::PreReasoning {
            messages: &mut messages,
        };
        assert_eq!(hook.on_event(&mut event).await, HookOutcome::Abort);
    }

    #[tokio::test]
    async fn registers_execution_on_first_reasoning_step_only() {
        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));

        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let context = test_context(store);
        let hook = AgentAbortHook::new(controller, context.clone());

        assert_eq!(controller.active_count(), 0, "must not register before the first hook event");

        let mut messages = vec!["hi".to_string()];
        let mut event = HookEvent::PreReasoning {
            messages: &mut messages,
        };
        assert_eq!(hook.on_event(&mut event).await, HookOutcome::Continue);
        assert_eq!(controller.active_count(), 1);

        let mut messages2 = vec!["again".to_string()];
        let mut event2 = HookEvent::PreReasoning {
            messages: &mut messages2,
        };
        assert_eq!(hook.on_event(&mut event2).await, HookOutcome::Continue);
        assert_eq!(controller.active_count(), 1, "second step must not re-register");
    }

    #[tokio::test]
    async fn injects_resume_message_appended_and_deletes_marker_once() {
        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));

        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let context = test_context(store.clone());
        let marker_field = SessionField::interrupted_marker();
        let marker = InterruptedMarker::new("drain", chrono::Utc::now());
        store
            .save(&context.session_key, &marker_field, &marker)
            .await
            .unwrap();

        let hook = AgentAbortHook::new(controller, context.clone());

        let mut messages = vec!["hi".to_string()];
        let mut event = HookEvent::PreReasoning {
            messages: &mut messages,
        };
        assert_eq!(hook.on_event(&mut event).await, HookOutcome::Continue);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "hi", "resume notice must be appended, not prepended");
        assert!(messages[1].contains("resumed"));

        let remaining = store
            .get::<InterruptedMarker>(&context.session_key, &marker_field)
            .await
            .unwrap();
        assert!(remaining.is_none(), "marker must be deleted once consumed");

        let mut messages2 = vec!["next step".to_string()];
        let mut event2 = HookEvent::PreReasoning {
            messages: &mut messages2,
        };
        assert_eq!(hook.on_event(&mut event2).await, HookOutcome::Continue);
        assert_eq!(messages2.len(), 1, "resume notice must not be injected more than once");
    }

    #[tokio::test]
    async fn complete_deletes_marker_and_serializes_state() {
        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));

        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let context = test_context(store.clone());
        let marker_field = SessionField::interrupted_marker();
        let marker = InterruptedMarker::new("drain", chrono::Utc::now());
        store
            .save(&context.session_key, &marker_field, &marker)
            .await
            .unwrap();

        let hook = AgentAbortHook::new(controller, context.clone());
        hook.complete().await;

        let remaining = store
            .get::<InterruptedMarker>(&context.session_key, &marker_field)
            .await
            .unwrap();
        assert!(remaining.is_none());
    }
}
