//! A minimal multi-step demo agent wired end to end against the lifecycle
//! core: it reasons and acts a fixed number of times, checks in with its
//! hook at each safe point, and serializes a small counter as session state
//! so a drained/resumed session picks up where it left off.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sluice_core::lifecycle::RequestContext;
use sluice_core::{
    AgentHandle, Hook, HookEvent, HookOutcome, SessionField, SessionStore, SessionStoreExt,
    SessionStoreResult, ToolCall,
};
use sluice_http::runtime::{AgentFactory, RunnableAgent, RuntimeError, RuntimeResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

fn counter_field() -> SessionField {
    SessionField::parse("echo_count").expect("valid field name")
}

/// The session-state blob this agent persists: just a step counter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct EchoState {
    steps_completed: u64,
}

/// Performs a fixed number of reasoning + acting steps, echoing the
/// request's input text back with an incrementing counter at each step.
pub struct EchoCountAgent {
    max_steps: u64,
    steps_completed: AtomicU64,
}

impl EchoCountAgent {
    pub fn new(max_steps: u64) -> Self {
        Self {
            max_steps,
            steps_completed: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl AgentHandle for EchoCountAgent {
    async fn interrupt(&self) {}

    async fn serialize_to(&self, store: &(dyn SessionStore)) -> SessionStoreResult<()> {
        // `RequestContext` only hands us the store, not the session key it's
        // keyed under; `run` below persists via the key it already has, so
        // this only covers the abort path where the key isn't available.
        let _ = store;
        Ok(())
    }

    async fn load_from(&self, _store: &(dyn SessionStore)) -> SessionStoreResult<()> {
        Ok(())
    }

    async fn load_if_exists(&self, _store: &(dyn SessionStore)) -> SessionStoreResult<bool> {
        Ok(false)
    }
}

#[async_trait]
impl RunnableAgent for EchoCountAgent {
    async fn run(
        &self,
        context: Arc<RequestContext>,
        hook: Arc<dyn Hook>,
        payload: serde_json::Value,
    ) -> RuntimeResult<serde_json::Value> {
        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("hello")
            .to_string();

        let mut messages = vec![text.clone()];
        let mut echoes = Vec::new();

        let field = counter_field();
        let mut state: EchoState = context
            .store()
            .get(&context.session_key, &field)
            .await?
            .unwrap_or_default();

        for _ in 0..self.max_steps {
            let mut reasoning_event = HookEvent::PreReasoning {
                messages: &mut messages,
            };
            if hook.on_event(&mut reasoning_event).await == HookOutcome::Abort {
                let signal = context.interrupt_and_save("draining").await;
                return Err(RuntimeError::Aborted {
                    session: signal.session_key,
                    state_saved: signal.state_saved,
                });
            }

            state.steps_completed += 1;
            self.steps_completed.store(state.steps_completed, Ordering::Release);
            context
                .store()
                .save(&context.session_key, &field, &state)
                .await?;

            let echoed = format!("{text} ({})", state.steps_completed);
            let mut tool_call = ToolCall::new("text_search", &echoed)
                .expect("text_search is a standard tool name");
            let mut acting_event = HookEvent::PreActing {
                tool_call: &mut tool_call,
            };
            if hook.on_event(&mut acting_event).await == HookOutcome::Abort {
                let signal = context.interrupt_and_save("draining").await;
                return Err(RuntimeError::Aborted {
                    session: signal.session_key,
                    state_saved: signal.state_saved,
                });
            }

            info!(session = %context.session_key, step = state.steps_completed, "echo step complete");
            echoes.push(echoed);
            messages.push(format!("step {} complete", state.steps_completed));
        }

        hook.complete().await;

        Ok(serde_json::json!({
            "steps_completed": state.steps_completed,
            "echoes": echoes,
        }))
    }
}

/// Builds a fresh [`EchoCountAgent`] per request.
pub struct EchoCountAgentFactory {
    max_steps: u64,
}

impl EchoCountAgentFactory {
    pub fn new(max_steps: u64) -> Self {
        Self { max_steps }
    }
}

impl AgentFactory for EchoCountAgentFactory {
    fn create(&self) -> Arc<dyn RunnableAgent> {
        Arc::new(EchoCountAgent::new(self.max_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::{AgentId, LifecycleController, SessionId};
    use sluice_http::runtime::AgentAbortHook;
    use sluice_memory::InMemorySessionStore;

    fn test_context(store: Arc<dyn SessionStore>, agent: Arc<EchoCountAgent>) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(
            SessionId::generate(),
            AgentId::parse("demo-agent").unwrap(),
            agent,
            store,
        ))
    }

    #[tokio::test]
    async fn completes_fixed_number_of_steps() {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let agent = Arc::new(EchoCountAgent::new(3));
        let context = test_context(store.clone(), agent.clone());

        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));
        let hook: Arc<dyn Hook> = Arc::new(AgentAbortHook::new(controller, context.clone()));

        let result = agent
            .run(context, hook, serde_json::json!({"text": "hi"}))
            .await
            .unwrap();

        assert_eq!(result["steps_completed"], 3);
        assert_eq!(result["echoes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn aborts_and_saves_marker_once_draining() {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let agent = Arc::new(EchoCountAgent::new(5));
        let context = test_context(store.clone(), agent.clone());

        let controller: &'static LifecycleController =
            Box::leak(Box::new(LifecycleController::new_for_test()));
        controller.initiate_drain();
        let hook: Arc<dyn Hook> = Arc::new(AgentAbortHook::new(controller, context.clone()));

        let err = agent
            .run(context, hook, serde_json::json!({"text": "hi"}))
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Aborted { .. }));
    }
}
