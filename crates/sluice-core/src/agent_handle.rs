//! The narrow contract a running execution exposes to the lifecycle core.
//!
//! `AgentHandle` is deliberately not the full reasoning-loop `Agent` trait:
//! the core never drives an agent's `observe`/`act` cycle, it only needs to
//! be able to ask a running execution to stop cooperatively and to persist
//! or restore its state across that stop.

use crate::error::SessionStoreResult;
use async_trait::async_trait;

/// A running (or resumable) agent execution, as seen by the lifecycle core.
#[async_trait]
pub trait AgentHandle: Send + Sync {
    /// Ask the execution to stop at its next safe point.
    ///
    /// This is cooperative: the agent only actually stops when its
    /// reasoning loop next checks in via a `Hook`. There is no preemptive
    /// cancellation.
    async fn interrupt(&self);

    /// Persist whatever state is needed to resume this execution later.
    async fn serialize_to(&self, store: &(dyn crate::session_store::SessionStore)) -> SessionStoreResult<()>;

    /// Restore state previously written by `serialize_to`.
    async fn load_from(&self, store: &(dyn crate::session_store::SessionStore)) -> SessionStoreResult<()>;

    /// Restore state if present; a no-op (not an error) if this is a fresh
    /// session with nothing to resume.
    async fn load_if_exists(&self, store: &(dyn crate::session_store::SessionStore)) -> SessionStoreResult<bool>;
}

/// The safe points at which an agent's reasoning loop checks in with its
/// hooks. Each variant carries the data a hook is allowed to inspect or
/// mutate at that point.
#[derive(Debug)]
pub enum HookEvent<'a> {
    /// Immediately before the agent issues its next reasoning (LLM) call.
    PreReasoning { messages: &'a mut Vec<String> },

    /// Immediately before the agent invokes a tool.
    PreActing {
        tool_call: &'a mut crate::tool::ToolCall,
    },
}

/// The outcome of a hook's safe-point check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Proceed with the reasoning/acting step as normal.
    Continue,
    /// Abort the execution now; the caller must persist state and stop.
    Abort,
}

/// A component that observes (and may abort) an execution at its safe
/// points. `AgentAbortHook` in the HTTP runtime is the production
/// implementation; tests may register simpler hooks.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Hooks run in ascending priority order; lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Inspect (and possibly mutate or abort) the event.
    async fn on_event(&self, event: &mut HookEvent<'_>) -> HookOutcome;

    /// Called once the execution has fully stopped, successfully or not.
    async fn complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysAbort;

    #[async_trait]
    impl Hook for AlwaysAbort {
        async fn on_event(&self, _event: &mut HookEvent<'_>) -> HookOutcome {
            HookOutcome::Abort
        }
    }

    #[tokio::test]
    async fn hook_can_abort_pre_reasoning() {
        let hook = AlwaysAbort;
        let mut messages = vec!["hello".to_string()];
        let mut event = HookEvent::PreReasoning {
            messages: &mut messages,
        };
        assert_eq!(hook.on_event(&mut event).await, HookOutcome::Abort);
    }

    #[test]
    fn default_priority_is_zero() {
        struct Noop;
        #[async_trait]
        impl Hook for Noop {
            async fn on_event(&self, _event: &mut HookEvent<'_>) -> HookOutcome {
                HookOutcome::Continue
            }
        }
        assert_eq!(Noop.priority(), 0);
    }
}
