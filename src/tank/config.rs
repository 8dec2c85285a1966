//! Tank AI tuning.

use serde::{Deserialize, Serialize};

/// Categories of interactable resources a tank crews via tokens.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Interactable {
    MachineGun,
    Cannon,
    Mortar,
    Boiler,
    Throttle,
}

impl Interactable {
    /// Whether this category can be aimed at a target.
    pub fn is_weapon(self) -> bool {
        matches!(self, Self::MachineGun | Self::Cannon | Self::Mortar)
    }
}

/// Behavior tuning for one tank, supplied by the host.
///
/// All distances are world units, all times are seconds on the host clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TankAiSettings {
    /// The distance at which this tank can see other tanks. Once an
    /// opposing tank is closer than this, the tank latches it as a target
    /// and pursues.
    pub view_range: f32,

    /// Should be less than view range. Once the target is closer than
    /// this, the tank switches to engage.
    pub engagement_range: f32,

    /// Once engaged, the tank tries to hold this much distance from its
    /// target.
    pub default_fighting_distance: f32,

    /// Band around the fighting distance counted as "close enough".
    pub fighting_distance_slack: f32,

    /// The number of activation tokens this tank starts with.
    pub token_economy: usize,

    /// Token weight tables applied on entering each state.
    pub patrol_weights: Vec<(Interactable, u32)>,
    pub pursue_weights: Vec<(Interactable, u32)>,
    pub engage_weights: Vec<(Interactable, u32)>,

    /// Seconds between forced token reshuffles while engaged.
    pub redistribute_cooldown: f64,

    /// Min/max seconds a patrolling tank keeps rolling one way before
    /// rolling a new direction.
    pub time_between_moves: (f64, f64),

    /// Seconds between patrol re-queries for the nearest opposing unit.
    pub target_refresh_interval: f64,

    /// Seconds between pursue movement decisions.
    pub pursue_heartbeat: f64,

    /// Seconds between engage movement decisions.
    pub engage_heartbeat: f64,

    /// Which weapon to hunt with, best first.
    pub weapon_priority: Vec<Interactable>,

    /// Aim scatter passed through to the weapon, 0 = perfect.
    pub aim_accuracy: f32,

    /// Seconds between aim-point refreshes while hunting.
    pub aim_refresh_interval: f64,
}

impl Default for TankAiSettings {
    fn default() -> Self {
        Self {
            view_range: 40.0,
            engagement_range: 20.0,
            default_fighting_distance: 12.0,
            fighting_distance_slack: 2.0,
            token_economy: 3,
            patrol_weights: vec![(Interactable::Boiler, 2), (Interactable::Throttle, 1)],
            pursue_weights: vec![
                (Interactable::Boiler, 1),
                (Interactable::Throttle, 1),
                (Interactable::MachineGun, 1),
            ],
            engage_weights: vec![
                (Interactable::MachineGun, 2),
                (Interactable::Cannon, 2),
                (Interactable::Boiler, 1),
            ],
            redistribute_cooldown: 12.0,
            time_between_moves: (4.0, 8.0),
            target_refresh_interval: 2.0,
            pursue_heartbeat: 5.0,
            engage_heartbeat: 1.0,
            weapon_priority: vec![
                Interactable::MachineGun,
                Interactable::Cannon,
                Interactable::Mortar,
            ],
            aim_accuracy: 0.5,
            aim_refresh_interval: 0.5,
        }
    }
}
