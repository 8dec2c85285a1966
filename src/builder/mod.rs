//! Builder API for ergonomic machine construction.
//!
//! Registration happens through fluent builders that validate at `build()`
//! time: every transition endpoint and substate parent must name a
//! registered state, and a substate must have at least one parent and one
//! enter condition.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::{MachineBuilder, SubstateBuilder};
