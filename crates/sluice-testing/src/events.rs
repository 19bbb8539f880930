//! `proptest` strategies for generating lifecycle event sequences.
//!
//! These feed the property tests in `sluice-core` and `sluice-http` that
//! check the invariants in spec §8: registration happens at most once per
//! session, the interrupted marker tracks the abort/complete path exactly,
//! and `LifecycleState` only ever advances.

use proptest::prelude::*;

/// One step a hook can observe for a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    PreReasoning,
    PreActing,
    Complete,
    Abort,
}

impl LifecycleEvent {
    fn strategy() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(LifecycleEvent::PreReasoning),
            Just(LifecycleEvent::PreActing),
            Just(LifecycleEvent::Complete),
            Just(LifecycleEvent::Abort),
        ]
    }
}

/// A sequence of events for one execution, ending in either `Complete` or
/// `Abort` — real executions always terminate one way or the other.
pub fn arb_event_sequence(max_len: usize) -> impl Strategy<Value = Vec<LifecycleEvent>> {
    prop::collection::vec(LifecycleEvent::strategy(), 0..max_len).prop_flat_map(|mut prefix| {
        prop_oneof![Just(LifecycleEvent::Complete), Just(LifecycleEvent::Abort)].prop_map(
            move |terminal| {
                prefix.push(terminal);
                prefix.clone()
            },
        )
    })
}

/// A batch of independent per-session event sequences, for exercising the
/// controller's active table under concurrent-looking load.
pub fn arb_session_batch(
    sessions: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<Vec<LifecycleEvent>>> {
    prop::collection::vec(arb_event_sequence(max_len), sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn sequences_always_end_terminal(seq in arb_event_sequence(8)) {
            let last = *seq.last().unwrap();
            prop_assert!(matches!(last, LifecycleEvent::Complete | LifecycleEvent::Abort));
        }
    }
}
