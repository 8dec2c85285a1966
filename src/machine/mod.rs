//! The state machine engine and its transition tables.
//!
//! The engine owns registration data and current-state bookkeeping; all
//! behavior side effects flow through the host context passed into each
//! tick. See [`StateMachine`] for the tick pipeline and its ordering
//! guarantees.

pub(crate) mod engine;
mod transition;

pub use engine::StateMachine;
pub use transition::{MachineError, Transition};
