//! Builders for machine and substate registration.

use crate::builder::error::BuildError;
use crate::core::{Guard, State, StateKey, Substate};
use crate::machine::engine::SubstateEntry;
use crate::machine::{StateMachine, Transition};
use std::collections::HashMap;

/// Registration builder for one substate: the instance, the parent states
/// it may run under, and its OR-combined enter/exit condition sets.
pub struct SubstateBuilder<K: StateKey, C> {
    key: K,
    inner: Box<dyn Substate<C>>,
    parents: Vec<K>,
    enter: Vec<Guard<C>>,
    exit: Vec<Guard<C>>,
}

impl<K: StateKey, C> SubstateBuilder<K, C> {
    pub fn new<S>(key: K, substate: S) -> Self
    where
        S: Substate<C> + 'static,
    {
        Self {
            key,
            inner: Box::new(substate),
            parents: Vec::new(),
            enter: Vec::new(),
            exit: Vec::new(),
        }
    }

    /// Register the substate under a parent state. Repeatable; the substate
    /// survives transitions between its parents.
    pub fn under(mut self, parent: K) -> Self {
        self.parents.push(parent);
        self
    }

    /// Add an enter condition. Conditions are OR-combined: any one being
    /// true (with no exit condition true) activates the substate.
    pub fn enter_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.enter.push(Guard::new(predicate));
        self
    }

    /// Add an exit condition. Conditions are OR-combined: any one being
    /// true deactivates the substate (and vetoes activation on the same
    /// tick).
    pub fn exit_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.exit.push(Guard::new(predicate));
        self
    }
}

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use stratagem::builder::MachineBuilder;
/// use stratagem::core::State;
/// use stratagem::state_key;
///
/// state_key! {
///     enum Tank {
///         Patrol,
///         Pursue,
///     }
/// }
///
/// struct Sensors {
///     target_visible: bool,
/// }
///
/// struct Idle;
/// impl State<Sensors> for Idle {}
///
/// let machine = MachineBuilder::new()
///     .state(Tank::Patrol, Idle)
///     .state(Tank::Pursue, Idle)
///     .initial(Tank::Patrol)
///     .transition(Tank::Patrol, Tank::Pursue, |s: &Sensors| s.target_visible)
///     .build();
///
/// assert!(machine.is_ok());
/// ```
pub struct MachineBuilder<K: StateKey, C> {
    initial: Option<K>,
    states: Vec<(K, Box<dyn State<C>>)>,
    transitions: Vec<(K, Transition<K, C>)>,
    any_transitions: Vec<Transition<K, C>>,
    substates: Vec<SubstateBuilder<K, C>>,
}

impl<K: StateKey, C> MachineBuilder<K, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            any_transitions: Vec::new(),
            substates: Vec::new(),
        }
    }

    /// Register a state under a key.
    pub fn state<S>(mut self, key: K, state: S) -> Self
    where
        S: State<C> + 'static,
    {
        self.states.push((key, Box::new(state)));
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, key: K) -> Self {
        self.initial = Some(key);
        self
    }

    /// Add a guarded edge from one state to another. Edges are evaluated in
    /// registration order; the first true guard wins.
    pub fn transition<F>(mut self, from: K, to: K, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.transitions.push((from, Transition::new(to, predicate)));
        self
    }

    /// Add a global edge evaluated regardless of the current state, before
    /// any local edge.
    pub fn any_transition<F>(mut self, to: K, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.any_transitions.push(Transition::new(to, predicate));
        self
    }

    /// Register a substate.
    pub fn substate(mut self, substate: SubstateBuilder<K, C>) -> Self {
        self.substates.push(substate);
        self
    }

    /// Build the state machine.
    /// Returns an error if registrations are missing or inconsistent.
    pub fn build(self) -> Result<StateMachine<K, C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut states: HashMap<K, Box<dyn State<C>>> = HashMap::new();
        for (key, state) in self.states {
            if states.insert(key, state).is_some() {
                return Err(BuildError::DuplicateState { key: key.name() });
            }
        }
        if !states.contains_key(&initial) {
            return Err(BuildError::UnknownState {
                key: initial.name(),
            });
        }

        let mut transitions: HashMap<K, Vec<Transition<K, C>>> = HashMap::new();
        for (from, transition) in self.transitions {
            for endpoint in [from, transition.to] {
                if !states.contains_key(&endpoint) {
                    return Err(BuildError::UnknownState {
                        key: endpoint.name(),
                    });
                }
            }
            transitions.entry(from).or_default().push(transition);
        }
        for transition in &self.any_transitions {
            if !states.contains_key(&transition.to) {
                return Err(BuildError::UnknownState {
                    key: transition.to.name(),
                });
            }
        }

        let mut substates: HashMap<K, SubstateEntry<C>> = HashMap::new();
        let mut substate_lists: HashMap<K, Vec<K>> = HashMap::new();
        for builder in self.substates {
            let key = builder.key;
            if builder.parents.is_empty() {
                return Err(BuildError::NoParents { key: key.name() });
            }
            if builder.enter.is_empty() {
                return Err(BuildError::NoEnterConditions { key: key.name() });
            }
            for parent in &builder.parents {
                if !states.contains_key(parent) {
                    return Err(BuildError::UnknownState {
                        key: parent.name(),
                    });
                }
            }
            let entry = SubstateEntry {
                inner: builder.inner,
                enter: builder.enter,
                exit: builder.exit,
            };
            if substates.insert(key, entry).is_some() {
                return Err(BuildError::DuplicateSubstate { key: key.name() });
            }
            for parent in builder.parents {
                substate_lists.entry(parent).or_default().push(key);
            }
        }

        Ok(StateMachine::from_parts(
            initial,
            states,
            transitions,
            self.any_transitions,
            substates,
            substate_lists,
        ))
    }
}

impl<K: StateKey, C> Default for MachineBuilder<K, C> {
    fn default() -> Self {
        Self::new()
    }
}
