//! Errors raised by the lifecycle controller and the per-execution abort path.

use crate::identifiers::SessionId;
use std::fmt;

/// Errors produced while registering, aborting, or draining executions.
#[derive(Debug, Clone)]
pub enum LifecycleError {
    /// A new execution was rejected because the controller is draining or
    /// terminated.
    NotAccepting {
        /// The state the controller was in when the request was rejected.
        state: &'static str,
    },

    /// The execution was aborted during a safe-point check.
    ///
    /// `state_saved` reports whether the agent's state was durably
    /// persisted before the abort was surfaced to the caller.
    Aborted {
        session: SessionId,
        state_saved: bool,
    },

    /// The interrupted-marker write failed after a successful abort.
    ///
    /// The execution still aborts; this only affects resume-on-restart
    /// detection, so it is logged rather than propagated to the caller.
    InterruptFailure {
        session: SessionId,
        details: String,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotAccepting { state } => {
                write!(f, "controller is not accepting new executions (state: {state})")
            }
            LifecycleError::Aborted {
                session,
                state_saved,
            } => {
                write!(
                    f,
                    "execution for session {session} was aborted (state_saved: {state_saved})"
                )
            }
            LifecycleError::InterruptFailure { session, details } => {
                write!(
                    f,
                    "failed to persist interrupted marker for session {session}: {details}"
                )
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_accepting_display() {
        let err = LifecycleError::NotAccepting { state: "Draining" };
        assert!(format!("{err}").contains("Draining"));
    }

    #[test]
    fn aborted_display_reports_state_saved() {
        let session = SessionId::generate();
        let err = LifecycleError::Aborted {
            session: session.clone(),
            state_saved: true,
        };
        let rendered = format!("{err}");
        assert!(rendered.contains(session.as_str()));
        assert!(rendered.contains("true"));
    }
}
