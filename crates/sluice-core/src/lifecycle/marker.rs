//! The interrupted-marker written whenever an execution is aborted mid-flight.
//!
//! Its presence under a session is how a later request (possibly on a
//! different replica, possibly after a process restart) knows to resume
//! rather than start fresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record that an execution for a session was interrupted before
/// completing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptedMarker {
    /// Human-readable reason (e.g. "drain", "client disconnect").
    pub reason: String,
    /// When the interruption was recorded.
    pub interrupted_at: DateTime<Utc>,
}

impl InterruptedMarker {
    pub fn new(reason: impl Into<String>, interrupted_at: DateTime<Utc>) -> Self {
        Self {
            reason: reason.into(),
            interrupted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_json() {
        let marker = InterruptedMarker::new("drain", Utc::now());
        let json = serde_json::to_string(&marker).unwrap();
        let decoded: InterruptedMarker = serde_json::from_str(&json).unwrap();
        assert_eq!(marker, decoded);
    }
}
