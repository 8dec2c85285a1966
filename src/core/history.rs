//! State transition history tracking.
//!
//! Immutable record of every state change the engine performed, kept for
//! debugging and telemetry. The engine appends to it on each transition;
//! hosts read it back through the machine or a snapshot.

use super::key::StateKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use stratagem::core::StateTransition;
/// use stratagem::state_key;
/// use chrono::Utc;
///
/// state_key! {
///     enum Tank {
///         Patrol,
///         Pursue,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Tank::Patrol,
///     to: Tank::Pursue,
///     timestamp: Utc::now(),
///     tick: 42,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<K: StateKey> {
    /// The state being transitioned from
    pub from: K,
    /// The state being transitioned to
    pub to: K,
    /// Wall-clock time of the change
    pub timestamp: DateTime<Utc>,
    /// Frame tick on which the transition fired
    pub tick: u64,
}

/// Ordered history of state changes.
///
/// `record` returns a new history rather than mutating, so observers can
/// hold cheap clones without racing the engine.
///
/// # Example
///
/// ```rust
/// use stratagem::core::{StateHistory, StateTransition};
/// use stratagem::state_key;
/// use chrono::Utc;
///
/// state_key! {
///     enum Tank {
///         Patrol,
///         Pursue,
///         Engage,
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Tank::Patrol,
///         to: Tank::Pursue,
///         timestamp: Utc::now(),
///         tick: 10,
///     })
///     .record(StateTransition {
///         from: Tank::Pursue,
///         to: Tank::Engage,
///         timestamp: Utc::now(),
///         tick: 25,
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Tank::Patrol, &Tank::Pursue, &Tank::Engage]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<K: StateKey> {
    transitions: Vec<StateTransition<K>>,
}

impl<K: StateKey> Default for StateHistory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey> StateHistory<K> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<K>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed: the first transition's source,
    /// then the target of every transition in order.
    pub fn get_path(&self) -> Vec<&K> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock duration from first to last transition, or `None` if the
    /// history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[StateTransition<K>] {
        &self.transitions
    }
}
