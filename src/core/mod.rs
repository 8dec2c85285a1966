//! Core state machine contracts.
//!
//! This module contains the pure parts of the machine:
//! - Stable state identity via the `StateKey` trait
//! - Behavior contracts via the `State` and `Substate` traits
//! - Guard predicates for transition and substate-condition control
//! - Immutable transition history
//!
//! Nothing here performs side effects on its own; all effects flow through
//! the host context handed to the lifecycle hooks.

mod guard;
mod history;
mod key;
mod state;
mod substate;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use key::StateKey;
pub use state::State;
pub use substate::{AsSubstate, Substate};
