//! The signal surfaced to callers (and to the HTTP streaming boundary) when
//! an execution is aborted.

use crate::identifiers::SessionId;

/// Describes why and how an execution stopped.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    pub session_key: SessionId,
    pub reason: String,
    /// Whether the agent's state was durably saved before the abort was
    /// surfaced. `false` means a resume would replay from the last
    /// successfully saved checkpoint, not from the exact interruption point.
    pub state_saved: bool,
}

impl AbortSignal {
    pub fn new(session_key: SessionId, reason: impl Into<String>, state_saved: bool) -> Self {
        Self {
            session_key,
            reason: reason.into(),
            state_saved,
        }
    }
}
