//! Stratagem: a hierarchical state machine for game AI
//!
//! Stratagem drives tick-based agents with a two-layer machine: top-level
//! states own the big behavioral picture, substates layer focused behaviors
//! on top of compatible parents and survive parent changes. Resource
//! contention between behaviors is settled by a token pool that caps how
//! many stations an agent can power at once.
//!
//! # Core Concepts
//!
//! - **Keys**: States are addressed by small `Copy` enum keys (`StateKey`),
//!   cheap to compare and serializable for telemetry
//! - **Guards**: Pure predicates over a shared context control transitions
//! - **Substates**: Secondary behaviors registered under one or more parent
//!   states, activated and deactivated by their own guard sets
//! - **Tokens**: A fixed pool of activation tokens rations the agent's
//!   attention across its registered resources
//! - **History**: Immutable tracking of state transitions over time
//!
//! # Example
//!
//! ```rust
//! use stratagem::{state_key, MachineBuilder, State};
//!
//! state_key! {
//!     pub enum Phase {
//!         Idle,
//!         Busy,
//!     }
//! }
//!
//! struct World {
//!     frames: u32,
//!     work_pending: bool,
//! }
//!
//! struct Idle;
//! impl State<World> for Idle {}
//!
//! struct Busy;
//! impl State<World> for Busy {
//!     fn frame_update(&mut self, ctx: &mut World) {
//!         ctx.frames += 1;
//!     }
//! }
//!
//! let mut machine = MachineBuilder::new()
//!     .state(Phase::Idle, Idle)
//!     .state(Phase::Busy, Busy)
//!     .initial(Phase::Idle)
//!     .transition(Phase::Idle, Phase::Busy, |ctx: &World| ctx.work_pending)
//!     .transition(Phase::Busy, Phase::Idle, |ctx: &World| !ctx.work_pending)
//!     .build()
//!     .unwrap();
//!
//! let mut world = World { frames: 0, work_pending: false };
//! machine.start(&mut world);
//!
//! world.work_pending = true;
//! machine.frame_update(&mut world);
//! assert_eq!(machine.current_state(), Some(Phase::Busy));
//! // A freshly entered state runs its frame update the same tick.
//! assert_eq!(world.frames, 1);
//! ```
//!
//! The [`tank`] module ships a complete machine built on these pieces: a
//! patrol/pursue/engage/surrender tank with a player-hunting substate and
//! token-rationed stations.

pub mod builder;
pub mod core;
pub mod machine;
pub mod schedule;
pub mod snapshot;
pub mod tank;
pub mod tokens;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, SubstateBuilder};
pub use core::{Guard, State, StateHistory, StateKey, StateTransition, Substate};
pub use machine::{MachineError, StateMachine, Transition};
pub use schedule::{Schedule, TaskOutcome};
pub use snapshot::{MachineSnapshot, SnapshotError};
pub use tokens::{ResourceId, TokenPool};
