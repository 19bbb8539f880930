//! The process-wide lifecycle state machine.

use std::sync::atomic::{AtomicU8, Ordering};

/// The three states a `LifecycleController` can be in.
///
/// Transitions are monotonic: `Running -> Draining -> Terminated`. There is
/// no path back to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Running = 0,
    Draining = 1,
    Terminated = 2,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Running => "Running",
            LifecycleState::Draining => "Draining",
            LifecycleState::Terminated => "Terminated",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Running,
            1 => LifecycleState::Draining,
            _ => LifecycleState::Terminated,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An atomic cell holding a `LifecycleState`, enforcing monotonic
/// transitions via compare-and-swap.
#[derive(Debug)]
pub struct AtomicLifecycleState(AtomicU8);

impl AtomicLifecycleState {
    pub fn new(initial: LifecycleState) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn load(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next` if `next` is strictly later than the current state.
    /// Returns `true` if the transition happened.
    pub fn advance_to(&self, next: LifecycleState) -> bool {
        loop {
            let current = self.0.load(Ordering::Acquire);
            if next as u8 <= current {
                return false;
            }
            if self
                .0
                .compare_exchange(current, next as u8, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }
}

impl Default for AtomicLifecycleState {
    fn default() -> Self {
        Self::new(LifecycleState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let state = AtomicLifecycleState::default();
        assert_eq!(state.load(), LifecycleState::Running);
    }

    #[test]
    fn advances_monotonically() {
        let state = AtomicLifecycleState::default();
        assert!(state.advance_to(LifecycleState::Draining));
        assert_eq!(state.load(), LifecycleState::Draining);
        assert!(state.advance_to(LifecycleState::Terminated));
        assert_eq!(state.load(), LifecycleState::Terminated);
    }

    #[test]
    fn rejects_backward_transitions() {
        let state = AtomicLifecycleState::default();
        assert!(state.advance_to(LifecycleState::Terminated));
        assert!(!state.advance_to(LifecycleState::Draining));
        assert_eq!(state.load(), LifecycleState::Terminated);
    }

    #[test]
    fn rejects_repeat_transitions() {
        let state = AtomicLifecycleState::default();
        assert!(state.advance_to(LifecycleState::Draining));
        assert!(!state.advance_to(LifecycleState::Draining));
    }
}
