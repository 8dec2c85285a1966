//! Build errors for machine registration.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(key) before .build()")]
    MissingInitialState,

    #[error("No states registered. Add at least one state")]
    NoStates,

    #[error("State '{key}' registered twice")]
    DuplicateState { key: &'static str },

    #[error("Substate '{key}' registered twice")]
    DuplicateSubstate { key: &'static str },

    #[error("'{key}' names a state that was never registered")]
    UnknownState { key: &'static str },

    #[error("Substate '{key}' has no enter condition and could never activate")]
    NoEnterConditions { key: &'static str },

    #[error("Substate '{key}' is not registered under any parent state")]
    NoParents { key: &'static str },
}
