//! Top-level tank behaviors.
//!
//! Each state is a thin adapter around the context: `on_enter` reshuffles
//! tokens for the new intent and starts the state's repeating decision
//! tasks, `on_exit` cancels every task and hands the tokens back. The
//! frame hooks only pump the task schedule; movement itself happens inside
//! the scheduled decisions.

use crate::core::State;
use crate::schedule::{Schedule, TaskOutcome};
use crate::tank::context::{TankContext, TankWorld};
use rand::Rng;

/// Patrol: roll back and forth on a lazy timer while watching for targets.
///
/// Runs two repeating tasks: a movement decision that picks a direction and
/// sleeps a random interval, and a target refresh that keeps the tracked
/// nearest opposing unit current.
pub struct PatrolState<W: TankWorld> {
    tasks: Schedule<TankContext<W>>,
}

impl<W: TankWorld> PatrolState<W> {
    pub fn new() -> Self {
        Self {
            tasks: Schedule::new(),
        }
    }
}

impl<W: TankWorld> Default for PatrolState<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TankWorld> State<TankContext<W>> for PatrolState<W> {
    fn on_enter(&mut self, ctx: &mut TankContext<W>) {
        log::debug!("patrol entered");
        let weights = ctx.settings.patrol_weights.clone();
        ctx.tokens.distribute_all_weighted(&weights);

        let now = ctx.time();
        self.tasks.after(0.0, now, |ctx: &mut TankContext<W>| {
            let direction: i8 = if ctx.rng.gen_range(0..2) == 1 { 1 } else { -1 };
            ctx.world.set_gear(direction);
            let (low, high) = ctx.settings.time_between_moves;
            TaskOutcome::RepeatAfter(ctx.rng.gen_range(low..=high))
        });
        self.tasks.after(0.0, now, |ctx: &mut TankContext<W>| {
            match ctx.world.nearest_opposing_unit() {
                Some(unit) => ctx.set_target(unit),
                None => ctx.clear_target(),
            }
            TaskOutcome::RepeatAfter(ctx.settings.target_refresh_interval)
        });
    }

    fn frame_update(&mut self, ctx: &mut TankContext<W>) {
        let now = ctx.time();
        self.tasks.run_due(now, ctx);
    }

    fn on_exit(&mut self, ctx: &mut TankContext<W>) {
        self.tasks.clear();
        ctx.tokens.retrieve_all(false);
    }
}

/// Pursue: close the distance to the tracked target at speed.
pub struct PursueState<W: TankWorld> {
    tasks: Schedule<TankContext<W>>,
}

impl<W: TankWorld> PursueState<W> {
    pub fn new() -> Self {
        Self {
            tasks: Schedule::new(),
        }
    }
}

impl<W: TankWorld> Default for PursueState<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TankWorld> State<TankContext<W>> for PursueState<W> {
    fn on_enter(&mut self, ctx: &mut TankContext<W>) {
        log::debug!("pursue entered");
        if ctx.target().is_none() {
            if let Some(unit) = ctx.world.nearest_opposing_unit() {
                ctx.set_target(unit);
            }
        }
        let weights = ctx.settings.pursue_weights.clone();
        ctx.tokens.distribute_all_weighted(&weights);

        let now = ctx.time();
        self.tasks.after(0.0, now, |ctx: &mut TankContext<W>| {
            if ctx.world.has_active_throttle() {
                if let Some(unit) = ctx.target() {
                    let gear = if ctx.world.is_right_of_unit(unit) { -2 } else { 2 };
                    ctx.world.set_gear(gear);
                }
            }
            TaskOutcome::RepeatAfter(ctx.settings.pursue_heartbeat)
        });
    }

    fn frame_update(&mut self, ctx: &mut TankContext<W>) {
        let now = ctx.time();
        self.tasks.run_due(now, ctx);
    }

    fn on_exit(&mut self, ctx: &mut TankContext<W>) {
        self.tasks.clear();
        ctx.tokens.retrieve_all(false);
    }
}

/// Engage: hold the fighting distance and keep the guns fed.
///
/// The movement heartbeat backs away when the target crowds in, doubles
/// speed when it drifts out of band, and has a 50/50 chance of a full stop
/// when the distance is right - the wandering keeps the movement from
/// looking mechanical. A second task periodically reclaims every token and
/// re-deals them by the engage weight table.
pub struct EngageState<W: TankWorld> {
    tasks: Schedule<TankContext<W>>,
}

impl<W: TankWorld> EngageState<W> {
    pub fn new() -> Self {
        Self {
            tasks: Schedule::new(),
        }
    }
}

impl<W: TankWorld> Default for EngageState<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TankWorld> State<TankContext<W>> for EngageState<W> {
    fn on_enter(&mut self, ctx: &mut TankContext<W>) {
        log::debug!("engage entered");
        let weights = ctx.settings.engage_weights.clone();
        ctx.tokens.distribute_all_weighted(&weights);

        let now = ctx.time();
        self.tasks.after(0.0, now, |ctx: &mut TankContext<W>| {
            let beat = TaskOutcome::RepeatAfter(ctx.settings.engage_heartbeat);
            let Some(unit) = ctx.target() else {
                return beat;
            };
            if !ctx.world.has_active_throttle() {
                return beat;
            }

            let mut direction: i8 = if ctx.world.is_right_of_unit(unit) { -1 } else { 1 };
            let distance = ctx.world.distance_to_unit(unit);
            let held = ctx.settings.default_fighting_distance;
            let slack = ctx.settings.fighting_distance_slack;
            let in_band = (distance - held).abs() <= slack;
            let too_close = distance < held - slack;

            if !in_band {
                direction *= 2;
            }
            if in_band && ctx.rng.gen_range(0..2) == 0 {
                direction = 0;
            }
            if too_close {
                ctx.world.set_gear(-direction);
            } else {
                ctx.world.set_gear(direction);
            }
            beat
        });
        let cooldown = ctx.settings.redistribute_cooldown;
        self.tasks.after(cooldown, now, |ctx: &mut TankContext<W>| {
            ctx.tokens.retrieve_all(true);
            let weights = ctx.settings.engage_weights.clone();
            ctx.tokens.distribute_all_weighted(&weights);
            TaskOutcome::RepeatAfter(ctx.settings.redistribute_cooldown)
        });
    }

    fn frame_update(&mut self, ctx: &mut TankContext<W>) {
        let now = ctx.time();
        self.tasks.run_due(now, ctx);
    }

    fn on_exit(&mut self, ctx: &mut TankContext<W>) {
        self.tasks.clear();
        ctx.tokens.retrieve_all(true);
    }
}

/// Surrender: stop the treads, strike the colors, release everything.
pub struct SurrenderState;

impl<W: TankWorld> State<TankContext<W>> for SurrenderState {
    fn on_enter(&mut self, ctx: &mut TankContext<W>) {
        log::info!("tank surrenders");
        ctx.world.set_gear(0);
        ctx.world.surrender();
    }

    fn on_exit(&mut self, ctx: &mut TankContext<W>) {
        ctx.tokens.retrieve_all(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tank::config::{Interactable, TankAiSettings};
    use crate::tank::context::UnitId;
    use crate::tokens::ResourceId;
    use std::sync::{Arc, Mutex};

    /// Scripted world capturing every command the AI issues.
    #[derive(Clone, Default)]
    struct ScriptedWorld {
        inner: Arc<Mutex<WorldData>>,
    }

    #[derive(Default)]
    struct WorldData {
        nearest: Option<UnitId>,
        unit_distance: f32,
        right_of_unit: bool,
        throttle_active: bool,
        gears: Vec<i8>,
        surrendered: bool,
    }

    impl ScriptedWorld {
        fn set_nearest(&self, unit: Option<UnitId>) {
            self.inner.lock().unwrap().nearest = unit;
        }

        fn set_unit_distance(&self, distance: f32) {
            self.inner.lock().unwrap().unit_distance = distance;
        }

        fn set_throttle(&self, active: bool) {
            self.inner.lock().unwrap().throttle_active = active;
        }

        fn gears(&self) -> Vec<i8> {
            self.inner.lock().unwrap().gears.clone()
        }

        fn surrendered(&self) -> bool {
            self.inner.lock().unwrap().surrendered
        }
    }

    impl TankWorld for ScriptedWorld {
        fn distance_to_player(&self) -> f32 {
            self.inner.lock().unwrap().unit_distance
        }
        fn distance_to_unit(&self, _unit: UnitId) -> f32 {
            self.inner.lock().unwrap().unit_distance
        }
        fn nearest_opposing_unit(&self) -> Option<UnitId> {
            self.inner.lock().unwrap().nearest
        }
        fn is_right_of_unit(&self, _unit: UnitId) -> bool {
            self.inner.lock().unwrap().right_of_unit
        }
        fn has_active_throttle(&self) -> bool {
            self.inner.lock().unwrap().throttle_active
        }
        fn weapon_intact(&self, _weapon: ResourceId) -> bool {
            true
        }
        fn should_surrender(&self) -> bool {
            false
        }
        fn set_gear(&mut self, gear: i8) {
            self.inner.lock().unwrap().gears.push(gear);
        }
        fn override_aim(&mut self, _weapon: ResourceId, _unit: UnitId) {}
        fn refresh_aim(&mut self, _weapon: ResourceId, _accuracy: f32) {}
        fn reset_aim(&mut self, _weapon: ResourceId) {}
        fn surrender(&mut self) {
            self.inner.lock().unwrap().surrendered = true;
        }
    }

    fn context(world: &ScriptedWorld) -> TankContext<ScriptedWorld> {
        let mut ctx = TankContext::new(world.clone(), TankAiSettings::default(), 42);
        for kind in [
            Interactable::MachineGun,
            Interactable::Cannon,
            Interactable::Boiler,
            Interactable::Throttle,
        ] {
            ctx.tokens.register(kind);
        }
        ctx
    }

    fn tick(ctx: &mut TankContext<ScriptedWorld>, state: &mut dyn State<TankContext<ScriptedWorld>>, dt: f64) {
        ctx.advance(dt);
        state.frame_update(ctx);
    }

    #[test]
    fn patrol_distributes_weighted_tokens_on_enter() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut patrol = PatrolState::new();

        patrol.on_enter(&mut ctx);

        // Default patrol weights favor boiler and throttle.
        assert!(ctx.tokens.has_token(Interactable::Boiler));
        assert!(ctx.tokens.has_token(Interactable::Throttle));
        assert!(!ctx.tokens.has_token(Interactable::MachineGun));
    }

    #[test]
    fn patrol_movement_decision_picks_a_direction() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut patrol = PatrolState::new();

        patrol.on_enter(&mut ctx);
        tick(&mut ctx, &mut patrol, 0.1);

        let gears = world.gears();
        assert_eq!(gears.len(), 1);
        assert!(gears[0] == 1 || gears[0] == -1);
    }

    #[test]
    fn patrol_waits_between_movement_decisions() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut patrol = PatrolState::new();

        patrol.on_enter(&mut ctx);
        tick(&mut ctx, &mut patrol, 0.1);
        // Default wait is 4-8 s; a short follow-up tick must not re-roll.
        tick(&mut ctx, &mut patrol, 1.0);
        assert_eq!(world.gears().len(), 1);

        // Past the longest possible wait it must have rolled again.
        tick(&mut ctx, &mut patrol, 8.0);
        assert_eq!(world.gears().len(), 2);
    }

    #[test]
    fn patrol_refreshes_the_tracked_target() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut patrol = PatrolState::new();

        patrol.on_enter(&mut ctx);
        tick(&mut ctx, &mut patrol, 0.1);
        assert_eq!(ctx.target(), None);

        let interval = ctx.settings.target_refresh_interval;
        world.set_nearest(Some(UnitId(9)));
        tick(&mut ctx, &mut patrol, interval);
        assert_eq!(ctx.target(), Some(UnitId(9)));

        world.set_nearest(None);
        tick(&mut ctx, &mut patrol, interval);
        assert_eq!(ctx.target(), None);
    }

    #[test]
    fn patrol_exit_cancels_tasks_and_returns_tokens() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut patrol = PatrolState::new();

        patrol.on_enter(&mut ctx);
        patrol.on_exit(&mut ctx);

        assert!(ctx.tokens.active().is_empty());
        let gears_before = world.gears().len();
        tick(&mut ctx, &mut patrol, 100.0);
        assert_eq!(world.gears().len(), gears_before);
    }

    #[test]
    fn pursue_latches_nearest_target_on_enter() {
        let world = ScriptedWorld::default();
        world.set_nearest(Some(UnitId(4)));
        let mut ctx = context(&world);
        let mut pursue = PursueState::new();

        pursue.on_enter(&mut ctx);
        assert_eq!(ctx.target(), Some(UnitId(4)));
    }

    #[test]
    fn pursue_heartbeat_drives_toward_target() {
        let world = ScriptedWorld::default();
        world.set_nearest(Some(UnitId(4)));
        world.set_throttle(true);
        let mut ctx = context(&world);
        let mut pursue = PursueState::new();

        pursue.on_enter(&mut ctx);
        tick(&mut ctx, &mut pursue, 0.1);

        // Target is to our right (is_right_of_unit false): full ahead right.
        assert_eq!(world.gears(), vec![2]);
    }

    #[test]
    fn pursue_heartbeat_idles_without_throttle() {
        let world = ScriptedWorld::default();
        world.set_nearest(Some(UnitId(4)));
        world.set_throttle(false);
        let mut ctx = context(&world);
        let mut pursue = PursueState::new();

        pursue.on_enter(&mut ctx);
        tick(&mut ctx, &mut pursue, 0.1);

        assert!(world.gears().is_empty());
    }

    #[test]
    fn engage_backs_away_when_too_close() {
        let world = ScriptedWorld::default();
        world.set_nearest(Some(UnitId(4)));
        world.set_throttle(true);
        // Well inside the fighting band (default 12 +- 2).
        world.set_unit_distance(5.0);
        let mut ctx = context(&world);
        ctx.set_target(UnitId(4));
        let mut engage = EngageState::new();

        engage.on_enter(&mut ctx);
        tick(&mut ctx, &mut engage, 0.1);

        // Too close and out of band: gear is -(direction * 2) = -2.
        assert_eq!(world.gears(), vec![-2]);
    }

    #[test]
    fn engage_doubles_speed_when_far_out_of_band() {
        let world = ScriptedWorld::default();
        world.set_nearest(Some(UnitId(4)));
        world.set_throttle(true);
        world.set_unit_distance(30.0);
        let mut ctx = context(&world);
        ctx.set_target(UnitId(4));
        let mut engage = EngageState::new();

        engage.on_enter(&mut ctx);
        tick(&mut ctx, &mut engage, 0.1);

        assert_eq!(world.gears(), vec![2]);
    }

    #[test]
    fn engage_redistributes_tokens_on_cooldown() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut engage = EngageState::new();

        engage.on_enter(&mut ctx);
        let outstanding = ctx.tokens.tokens_outstanding();
        assert!(outstanding > 0);

        // Burn a token so the reshuffle has something to restore.
        let holder = ctx.tokens.holder_of(Interactable::MachineGun).unwrap();
        ctx.tokens.retrieve(holder);

        let cooldown = ctx.settings.redistribute_cooldown;
        tick(&mut ctx, &mut engage, cooldown + 0.1);
        assert_eq!(ctx.tokens.tokens_outstanding(), outstanding);
    }

    #[test]
    fn engage_exit_forces_every_token_back() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut engage = EngageState::new();

        engage.on_enter(&mut ctx);
        if let Some(holder) = ctx.tokens.holder_of(Interactable::MachineGun) {
            ctx.tokens.lock(holder);
        }
        engage.on_exit(&mut ctx);

        assert!(ctx.tokens.active().is_empty());
    }

    #[test]
    fn surrender_stops_and_strikes_colors() {
        let world = ScriptedWorld::default();
        let mut ctx = context(&world);
        let mut surrender = SurrenderState;

        State::<TankContext<ScriptedWorld>>::on_enter(&mut surrender, &mut ctx);

        assert_eq!(world.gears(), vec![0]);
        assert!(world.surrendered());
    }
}
