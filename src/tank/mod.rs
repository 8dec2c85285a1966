//! The shipped tank AI: a ready-made machine over the engine.
//!
//! Four top-level behaviors (patrol, pursue, engage, surrender) plus the
//! player-hunting substate, wired together by [`TankAi::build`]. The host
//! game implements [`TankWorld`] and pumps [`TankAi::frame_update`] /
//! [`TankAi::physics_update`] from its own loop.
//!
//! ```
//! use stratagem::tank::{Interactable, TankAi, TankAiSettings, TankKey, TankWorld, UnitId};
//! use stratagem::tokens::ResourceId;
//!
//! struct Dummy;
//!
//! impl TankWorld for Dummy {
//!     fn distance_to_player(&self) -> f32 { 100.0 }
//!     fn distance_to_unit(&self, _unit: UnitId) -> f32 { 100.0 }
//!     fn nearest_opposing_unit(&self) -> Option<UnitId> { None }
//!     fn is_right_of_unit(&self, _unit: UnitId) -> bool { false }
//!     fn has_active_throttle(&self) -> bool { false }
//!     fn weapon_intact(&self, _weapon: ResourceId) -> bool { true }
//!     fn should_surrender(&self) -> bool { false }
//!     fn set_gear(&mut self, _gear: i8) {}
//!     fn override_aim(&mut self, _weapon: ResourceId, _unit: UnitId) {}
//!     fn refresh_aim(&mut self, _weapon: ResourceId, _accuracy: f32) {}
//!     fn reset_aim(&mut self, _weapon: ResourceId) {}
//!     fn surrender(&mut self) {}
//! }
//!
//! let mut ai = TankAi::build(Dummy, TankAiSettings::default(), 1).unwrap();
//! ai.register_interactable(Interactable::Throttle);
//! ai.start();
//! ai.frame_update(0.016);
//! assert_eq!(ai.current_state(), Some(TankKey::Patrol));
//! ```

mod config;
mod context;
mod hunt;
mod states;

pub use config::{Interactable, TankAiSettings};
pub use context::{TankContext, TankWorld, UnitId};
pub use hunt::HuntPlayer;
pub use states::{EngageState, PatrolState, PursueState, SurrenderState};

use crate::builder::{BuildError, MachineBuilder, SubstateBuilder};
use crate::machine::StateMachine;
use crate::snapshot::MachineSnapshot;
use crate::state_key;
use crate::tokens::ResourceId;

state_key! {
    /// Top-level tank behaviors plus the hunt substate key.
    pub enum TankKey {
        Patrol,
        Pursue,
        Engage,
        Surrender,
        HuntPlayer,
    }
}

/// One tank's brain: the machine, its context, and a pumpable front.
pub struct TankAi<W: TankWorld> {
    machine: StateMachine<TankKey, TankContext<W>>,
    ctx: TankContext<W>,
}

impl<W: TankWorld + 'static> TankAi<W> {
    /// Assemble the standard tank machine over the given world.
    ///
    /// The seed drives the movement dice; two tanks built with the same
    /// seed and a deterministic world behave identically.
    pub fn build(world: W, settings: TankAiSettings, seed: u64) -> Result<Self, BuildError> {
        let ctx = TankContext::new(world, settings, seed);

        let machine = MachineBuilder::new()
            .state(TankKey::Patrol, PatrolState::<W>::new())
            .state(TankKey::Pursue, PursueState::<W>::new())
            .state(TankKey::Engage, EngageState::<W>::new())
            .state(TankKey::Surrender, SurrenderState)
            .initial(TankKey::Patrol)
            .transition(TankKey::Patrol, TankKey::Pursue, |ctx: &TankContext<W>| {
                ctx.world.distance_to_player() < ctx.settings.view_range
            })
            .transition(TankKey::Pursue, TankKey::Engage, |ctx: &TankContext<W>| {
                match ctx.target() {
                    Some(unit) => {
                        ctx.world.distance_to_unit(unit) < ctx.settings.engagement_range
                    }
                    None => false,
                }
            })
            .transition(TankKey::Pursue, TankKey::Patrol, |ctx: &TankContext<W>| {
                !ctx.target_in_view()
            })
            .transition(TankKey::Engage, TankKey::Pursue, |ctx: &TankContext<W>| {
                match ctx.target() {
                    Some(unit) => {
                        ctx.world.distance_to_unit(unit) > ctx.settings.engagement_range
                    }
                    None => true,
                }
            })
            .any_transition(TankKey::Surrender, |ctx: &TankContext<W>| {
                ctx.world.should_surrender()
            })
            .substate(
                SubstateBuilder::new(TankKey::HuntPlayer, HuntPlayer::<W>::new())
                    .under(TankKey::Pursue)
                    .under(TankKey::Engage)
                    .enter_when(|ctx: &TankContext<W>| {
                        ctx.target().is_some()
                            && ctx
                                .settings
                                .weapon_priority
                                .iter()
                                .any(|kind| ctx.tokens.is_available(*kind))
                    })
                    .exit_when(|ctx: &TankContext<W>| !ctx.target_in_view()),
            )
            .build()?;

        Ok(Self { machine, ctx })
    }

    /// Register one of the tank's physical stations with the token pool.
    pub fn register_interactable(&mut self, kind: Interactable) -> ResourceId {
        self.ctx.tokens.register(kind)
    }

    /// Flag a station as usable or broken. Going unavailable also drops
    /// any token the station held.
    pub fn set_interactable_available(&mut self, id: ResourceId, available: bool) {
        self.ctx.tokens.set_available(id, available);
    }

    /// Enter the initial behavior. Updates before this are no-ops.
    pub fn start(&mut self) {
        self.machine.start(&mut self.ctx);
    }

    /// Advance the clock and run one decision frame.
    pub fn frame_update(&mut self, dt: f64) {
        self.ctx.advance(dt);
        self.machine.frame_update(&mut self.ctx);
    }

    /// Run one physics step. No transitions are evaluated here.
    pub fn physics_update(&mut self) {
        self.machine.physics_update(&mut self.ctx);
    }

    pub fn current_state(&self) -> Option<TankKey> {
        self.machine.current_state()
    }

    pub fn current_substate(&self) -> Option<TankKey> {
        self.machine.current_substate()
    }

    /// Whether the active substate asks the host to pause parent movement.
    pub fn substate_pauses_parent(&self) -> bool {
        self.machine.substate_pauses_parent()
    }

    /// Observational snapshot of the machine for telemetry or debugging.
    pub fn snapshot(&self) -> MachineSnapshot<TankKey> {
        MachineSnapshot::capture(&self.machine)
    }

    /// The bundled context, for inspection from the host.
    pub fn context(&self) -> &TankContext<W> {
        &self.ctx
    }

    /// Mutable context access, for hosts that feed targets or settings
    /// directly.
    pub fn context_mut(&mut self) -> &mut TankContext<W> {
        &mut self.ctx
    }
}
