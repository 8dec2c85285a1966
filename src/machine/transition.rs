//! Transition edges and machine errors.

use crate::core::{Guard, StateKey};

/// A directed edge to a target state, taken when its guard holds.
///
/// Edges are stored per source state (local transitions) or machine-wide
/// (global transitions); the source is the table key, not part of the edge.
pub struct Transition<K: StateKey, C> {
    pub to: K,
    pub guard: Guard<C>,
}

impl<K: StateKey, C> Transition<K, C> {
    pub fn new<F>(to: K, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to,
            guard: Guard::new(predicate),
        }
    }
}

/// Errors from driving a built machine.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// `set_state` named a key no state was registered under.
    #[error("No state registered under key '{key}'")]
    UnknownState { key: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_key;

    state_key! {
        enum TestKey {
            Patrol,
            Pursue,
        }
    }

    #[test]
    fn transition_evaluates_its_guard() {
        let edge: Transition<TestKey, bool> = Transition::new(TestKey::Pursue, |visible| *visible);

        assert!(edge.guard.check(&true));
        assert!(!edge.guard.check(&false));
        assert_eq!(edge.to, TestKey::Pursue);
    }

    #[test]
    fn unknown_state_error_names_the_key() {
        let error = MachineError::UnknownState {
            key: TestKey::Patrol.name(),
        };
        assert!(error.to_string().contains("Patrol"));
    }
}
