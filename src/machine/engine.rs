//! The state machine engine.
//!
//! Owns the current state and substate, the transition tables and the
//! substate condition tables, and drives one unit's behavior tick by tick.
//! Each frame tick runs, in order: transition evaluation, the state change
//! if one fired, substate evaluation, then update dispatch. Physics ticks
//! only dispatch.

use crate::core::{Guard, State, StateHistory, StateKey, StateTransition, Substate};
use crate::machine::transition::{MachineError, Transition};
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

pub(crate) struct SubstateEntry<C> {
    pub(crate) inner: Box<dyn Substate<C>>,
    pub(crate) enter: Vec<Guard<C>>,
    pub(crate) exit: Vec<Guard<C>>,
}

/// Hierarchical state machine over a key type `K` and host context `C`.
///
/// Built through [`MachineBuilder`](crate::builder::MachineBuilder); the
/// host then calls [`start`](Self::start) once and
/// [`frame_update`](Self::frame_update) / [`physics_update`](Self::physics_update)
/// exactly once per frame / physics step.
///
/// # Evaluation order
///
/// Global transitions are checked before the current state's local ones,
/// both in registration order, and the first true guard wins - so a global
/// edge always beats a simultaneously-true local edge. Transitions are
/// evaluated before updates are dispatched, which means a state entered this
/// tick cannot re-exit until the next tick.
///
/// # Substates
///
/// At most one substate is active machine-wide. While one is active only
/// its exit conditions are evaluated, and a deactivation suppresses that
/// tick's activation scan, so a substate never enters and exits within the
/// same tick. On a state change, an active substate survives if it is also
/// registered under the target state; otherwise it exits before the old
/// state's `on_exit` runs, so the old state can observe whether its
/// substate is still alive while cleaning up.
pub struct StateMachine<K: StateKey, C> {
    id: Uuid,
    states: HashMap<K, Box<dyn State<C>>>,
    transitions: HashMap<K, Vec<Transition<K, C>>>,
    any_transitions: Vec<Transition<K, C>>,
    substates: HashMap<K, SubstateEntry<C>>,
    substate_lists: HashMap<K, Vec<K>>,
    initial: K,
    current: Option<K>,
    active_substate: Option<K>,
    history: StateHistory<K>,
    tick: u64,
}

impl<K: StateKey, C> StateMachine<K, C> {
    pub(crate) fn from_parts(
        initial: K,
        states: HashMap<K, Box<dyn State<C>>>,
        transitions: HashMap<K, Vec<Transition<K, C>>>,
        any_transitions: Vec<Transition<K, C>>,
        substates: HashMap<K, SubstateEntry<C>>,
        substate_lists: HashMap<K, Vec<K>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            states,
            transitions,
            any_transitions,
            substates,
            substate_lists,
            initial,
            current: None,
            active_substate: None,
            history: StateHistory::new(),
            tick: 0,
        }
    }

    /// Enter the initial state. Does nothing if the machine already started.
    pub fn start(&mut self, ctx: &mut C) {
        if self.current.is_some() {
            return;
        }
        self.enter_state(self.initial, ctx);
    }

    /// Run one frame tick: transitions, substate conditions, then frame
    /// dispatch to the current state and active substate.
    ///
    /// A defined no-op before [`start`](Self::start).
    pub fn frame_update(&mut self, ctx: &mut C) {
        if self.current.is_none() {
            return;
        }
        self.tick += 1;

        if let Some(target) = self.next_transition(ctx) {
            self.enter_state(target, ctx);
        }
        self.evaluate_substates(ctx);

        if let Some(current) = self.current {
            if let Some(state) = self.states.get_mut(&current) {
                state.frame_update(ctx);
            }
        }
        if let Some(active) = self.active_substate {
            if let Some(entry) = self.substates.get_mut(&active) {
                entry.inner.frame_update(ctx);
            }
        }
    }

    /// Run one physics tick: dispatch only, no transition or substate
    /// evaluation.
    ///
    /// A defined no-op before [`start`](Self::start).
    pub fn physics_update(&mut self, ctx: &mut C) {
        if let Some(current) = self.current {
            if let Some(state) = self.states.get_mut(&current) {
                state.physics_update(ctx);
            }
        }
        if let Some(active) = self.active_substate {
            if let Some(entry) = self.substates.get_mut(&active) {
                entry.inner.physics_update(ctx);
            }
        }
    }

    /// Force a state change outside the transition tables.
    pub fn set_state(&mut self, target: K, ctx: &mut C) -> Result<(), MachineError> {
        if !self.states.contains_key(&target) {
            return Err(MachineError::UnknownState { key: target.name() });
        }
        self.enter_state(target, ctx);
        Ok(())
    }

    /// The current state's key, or `None` before `start`.
    pub fn current_state(&self) -> Option<K> {
        self.current
    }

    /// The active substate's key, if any.
    pub fn current_substate(&self) -> Option<K> {
        self.active_substate
    }

    /// Whether the active substate asks its parent to suspend updates.
    /// `false` when no substate is active. The engine itself dispatches the
    /// parent regardless; this query is for the cooperating layers.
    pub fn substate_pauses_parent(&self) -> bool {
        self.active_substate
            .and_then(|key| self.substates.get(&key))
            .map(|entry| entry.inner.pause_parent())
            .unwrap_or(false)
    }

    /// Frame ticks executed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Machine instance id, for correlating snapshots and logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Transition history.
    pub fn history(&self) -> &StateHistory<K> {
        &self.history
    }

    /// First transition whose guard holds: global edges first, then the
    /// current state's local edges, each in registration order.
    fn next_transition(&self, ctx: &C) -> Option<K> {
        for transition in &self.any_transitions {
            if transition.guard.check(ctx) {
                return Some(transition.to);
            }
        }
        let current = self.current?;
        // Unregistered states fall back to an empty edge list.
        let local = self
            .transitions
            .get(&current)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for transition in local {
            if transition.guard.check(ctx) {
                return Some(transition.to);
            }
        }
        None
    }

    /// State-change procedure. Substate disposition is decided against the
    /// target's registration list before the old state's `on_exit` runs.
    fn enter_state(&mut self, target: K, ctx: &mut C) {
        if self.current == Some(target) {
            return;
        }

        if let Some(active) = self.active_substate {
            let survives = self
                .substate_lists
                .get(&target)
                .is_some_and(|list| list.contains(&active));
            if !survives {
                log::debug!("substate {} exits (incompatible with {})", active.name(), target.name());
                if let Some(entry) = self.substates.get_mut(&active) {
                    entry.inner.on_exit(ctx);
                }
                self.active_substate = None;
            }
        }

        if let Some(previous) = self.current {
            if let Some(state) = self.states.get_mut(&previous) {
                state.on_exit(ctx);
            }
            self.history = self.history.record(StateTransition {
                from: previous,
                to: target,
                timestamp: Utc::now(),
                tick: self.tick,
            });
            log::debug!("state change: {} -> {}", previous.name(), target.name());
        } else {
            log::debug!("entering initial state: {}", target.name());
        }

        self.current = Some(target);
        if let Some(state) = self.states.get_mut(&target) {
            state.on_enter(ctx);
        }
    }

    /// Substate condition pass. While a substate is active only its exit
    /// conditions run, and deactivating suppresses this tick's activation
    /// scan; otherwise the current state's candidates are scanned in
    /// registration order and the first whose enter set fires (with no exit
    /// condition simultaneously true) activates.
    fn evaluate_substates(&mut self, ctx: &mut C) {
        if let Some(active) = self.active_substate {
            let should_exit = self
                .substates
                .get(&active)
                .map(|entry| entry.exit.iter().any(|guard| guard.check(ctx)))
                .unwrap_or(false);
            if should_exit {
                log::debug!("substate {} exits", active.name());
                if let Some(entry) = self.substates.get_mut(&active) {
                    entry.inner.on_exit(ctx);
                }
                self.active_substate = None;
            }
            return;
        }

        let Some(current) = self.current else {
            return;
        };
        let candidates = match self.substate_lists.get(&current) {
            Some(list) => list.clone(),
            None => return,
        };
        for key in candidates {
            let Some(entry) = self.substates.get(&key) else {
                continue;
            };
            let wants_enter = entry.enter.iter().any(|guard| guard.check(ctx));
            let blocked = entry.exit.iter().any(|guard| guard.check(ctx));
            if wants_enter && !blocked {
                log::debug!("substate {} enters under {}", key.name(), current.name());
                if let Some(entry) = self.substates.get_mut(&key) {
                    entry.inner.on_enter(ctx);
                }
                self.active_substate = Some(key);
                return;
            }
        }
    }
}
