//! The tank's view of the world, injected into every behavior hook.
//!
//! The AI never touches the engine, physics or audio directly: everything
//! it can sense or do is a method on the [`TankWorld`] port the host
//! implements. [`TankContext`] bundles that port with the token pool, the
//! tuning, a seeded RNG and the clock, and is the single `&mut` handed to
//! states and substates each tick.

use crate::tank::config::{Interactable, TankAiSettings};
use crate::tokens::{ResourceId, TokenPool};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Handle to one opposing unit tracked by the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Sensor queries and action commands the host exposes to one tank's AI.
///
/// Sensors must be cheap and side-effect-free; commands may do anything on
/// the host's side but return nothing - the AI re-reads sensors next tick
/// rather than trusting a command succeeded.
pub trait TankWorld: Send {
    // --- sensors ---

    /// Distance to the player's tank.
    fn distance_to_player(&self) -> f32;

    /// Distance to a tracked unit, `f32::INFINITY` if it no longer exists.
    fn distance_to_unit(&self, unit: UnitId) -> f32;

    /// Nearest opposing unit, if any is tracked.
    fn nearest_opposing_unit(&self) -> Option<UnitId>;

    /// Whether this tank is to the right of the unit.
    fn is_right_of_unit(&self, unit: UnitId) -> bool;

    /// Whether the throttle is crewed and burning.
    fn has_active_throttle(&self) -> bool;

    /// Whether a weapon resource still exists and can fire.
    fn weapon_intact(&self, weapon: ResourceId) -> bool;

    /// Whether the tank has taken enough damage to give up.
    fn should_surrender(&self) -> bool;

    // --- commands ---

    /// Set the tank's gear: negative is left, positive right, zero stop.
    /// Magnitude is speed setting.
    fn set_gear(&mut self, gear: i8);

    /// Point a weapon's aim at a unit, overriding its idle behavior.
    fn override_aim(&mut self, weapon: ResourceId, unit: UnitId);

    /// Re-converge an overridden weapon's aim point with the given scatter.
    fn refresh_aim(&mut self, weapon: ResourceId, accuracy: f32);

    /// Drop a weapon's aim override, returning it to idle behavior.
    fn reset_aim(&mut self, weapon: ResourceId);

    /// Strike the colors.
    fn surrender(&mut self);
}

/// Everything one tank's behaviors can reach, bundled for injection.
pub struct TankContext<W: TankWorld> {
    pub world: W,
    pub tokens: TokenPool<Interactable>,
    pub settings: TankAiSettings,
    pub rng: ChaCha8Rng,
    clock: f64,
    target: Option<UnitId>,
}

impl<W: TankWorld> TankContext<W> {
    pub fn new(world: W, settings: TankAiSettings, seed: u64) -> Self {
        let tokens = TokenPool::new(settings.token_economy);
        Self {
            world,
            tokens,
            settings,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            target: None,
        }
    }

    /// Current host-clock time in seconds.
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// Advance the clock. Called by the facade once per frame.
    pub(crate) fn advance(&mut self, dt: f64) {
        self.clock += dt;
    }

    /// The unit this tank is currently after, if any.
    pub fn target(&self) -> Option<UnitId> {
        self.target
    }

    pub fn set_target(&mut self, unit: UnitId) {
        self.target = Some(unit);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Whether the tracked target is still close enough to matter.
    /// Loses the target beyond view range or when the unit disappears.
    pub fn target_in_view(&self) -> bool {
        match self.target {
            Some(unit) => self.world.distance_to_unit(unit) < self.settings.view_range,
            None => false,
        }
    }
}
