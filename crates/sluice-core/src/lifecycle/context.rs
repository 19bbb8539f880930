//! Per-execution bookkeeping held by the `ActiveTable`.

use crate::agent_handle::AgentHandle;
use crate::error::{LifecycleError, LifecycleResult};
use crate::identifiers::{AgentId, SessionId};
use crate::lifecycle::abort::AbortSignal;
use crate::lifecycle::marker::InterruptedMarker;
use crate::session_store::{SessionField, SessionStore, SessionStoreExt};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::warn;

/// Everything the lifecycle core needs to track and, if necessary, abort a
/// single in-flight execution.
pub struct RequestContext {
    pub session_key: SessionId,
    pub agent_id: AgentId,
    agent: Arc<dyn AgentHandle>,
    store: Arc<dyn SessionStore>,
    pub started_at: Instant,
    interrupted: AtomicBool,
}

impl RequestContext {
    pub fn new(
        session_key: SessionId,
        agent_id: AgentId,
        agent: Arc<dyn AgentHandle>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            session_key,
            agent_id,
            agent,
            store,
            started_at: Instant::now(),
            interrupted: AtomicBool::new(false),
        }
    }

    /// Whether `interrupt_and_save` has already been called for this context.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// The session store backing this execution, for agents that need to
    /// persist state beyond what `AgentHandle::serialize_to` covers.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Persist the agent's state without marking the execution interrupted.
    /// Used on normal completion, where `interrupt_and_save` (which also
    /// asks the agent to stop and writes the interrupted marker) would be
    /// the wrong call.
    pub async fn serialize_state(&self) -> crate::error::SessionStoreResult<()> {
        self.agent.serialize_to(self.store.as_ref()).await
    }

    /// Mark the execution interrupted (set-once), ask the agent to stop,
    /// persist its state, and write the interrupted marker.
    ///
    /// Safe to call more than once: only the first caller performs the
    /// work, everyone else observes `AbortSignal { state_saved: false }`
    /// immediately since the real abort is already in flight.
    pub async fn interrupt_and_save(&self, reason: impl Into<String>) -> AbortSignal {
        let reason = reason.into();
        if self
            .interrupted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return AbortSignal::new(self.session_key.clone(), reason, false);
        }

        self.agent.interrupt().await;

        let state_saved = match self.agent.serialize_to(self.store.as_ref()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session = %self.session_key, error = %e, "failed to persist agent state on abort");
                false
            }
        };

        let marker_field = SessionField::interrupted_marker();
        let marker = InterruptedMarker::new(reason.clone(), Utc::now());
        if let Err(e) = self
            .store
            .save(&self.session_key, &marker_field, &marker)
            .await
        {
            let lifecycle_err = LifecycleError::InterruptFailure {
                session: self.session_key.clone(),
                details: e.to_string(),
            };
            warn!(session = %self.session_key, error = %lifecycle_err, "failed to write interrupted marker");
        }

        AbortSignal::new(self.session_key.clone(), reason, state_saved)
    }

    /// Surface `Aborted` if `interrupt_and_save` has already run for this
    /// context; otherwise `Ok(())`.
    pub fn check_not_aborted(&self) -> LifecycleResult<()> {
        if self.is_interrupted() {
            Err(LifecycleError::Aborted {
                session: self.session_key.clone(),
                state_saved: true,
            })
        } else {
            Ok(())
        }
    }
}
