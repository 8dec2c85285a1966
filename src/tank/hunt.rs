//! The player-hunting substate.
//!
//! While active it commandeers exactly one weapon: it walks the configured
//! priority list, secures a token for the best weapon it can power, locks
//! that token against the parent state's unforced bulk retrievals and keeps
//! the weapon's aim glued to the tracked unit with a repeating refresh task.
//! Tokens are never stolen from the priority walk's winner by accident - a
//! fresh draw is preferred, then a loan from a lesser weapon, then a loan
//! from the boiler. Loans are repaid on exit.

use crate::core::Substate;
use crate::schedule::{Schedule, TaskOutcome};
use crate::tank::config::Interactable;
use crate::tank::context::{TankContext, TankWorld, UnitId};
use crate::tokens::ResourceId;

pub struct HuntPlayer<W: TankWorld> {
    tasks: Schedule<TankContext<W>>,
    weapon: Option<ResourceId>,
    /// The bound token came from the pool's free pile and goes back on exit.
    fresh_token: bool,
    /// Category the token was pulled from; repaid on exit.
    borrowed_from: Option<Interactable>,
    /// Latched after a failed bind so a busted weapon triggers at most one
    /// rebind attempt per activation.
    rebind_blocked: bool,
}

impl<W: TankWorld> HuntPlayer<W> {
    pub fn new() -> Self {
        Self {
            tasks: Schedule::new(),
            weapon: None,
            fresh_token: false,
            borrowed_from: None,
            rebind_blocked: false,
        }
    }

    /// Walk the priority list and secure a token for the best weapon that
    /// can take one. Sets the blocked latch when nothing can be powered.
    fn bind_weapon(&mut self, ctx: &mut TankContext<W>) {
        let Some(unit) = ctx.target() else {
            self.rebind_blocked = true;
            return;
        };
        let priority = ctx.settings.weapon_priority.clone();
        for (rank, kind) in priority.iter().enumerate() {
            if !ctx.tokens.is_available(*kind) {
                continue;
            }
            // Already powered: ride the existing token.
            if let Some(held) = ctx.tokens.holder_of(*kind) {
                self.take_aim(ctx, held, unit);
                return;
            }
            // Pool headroom: draw a fresh token, returned on exit.
            if let Some(id) = ctx.tokens.distribute(*kind) {
                self.fresh_token = true;
                self.take_aim(ctx, id, unit);
                return;
            }
            // No headroom: borrow from the least valuable weapon below this
            // one, falling back to the boiler.
            let mut donors: Vec<Interactable> = priority[rank + 1..].to_vec();
            donors.reverse();
            donors.push(Interactable::Boiler);
            for donor in donors {
                if ctx.tokens.retrieve_tag(donor).is_none() {
                    continue;
                }
                if let Some(id) = ctx.tokens.distribute(*kind) {
                    self.borrowed_from = Some(donor);
                    self.take_aim(ctx, id, unit);
                    return;
                }
            }
        }
        log::debug!("hunt could not power any weapon");
        self.rebind_blocked = true;
    }

    fn take_aim(&mut self, ctx: &mut TankContext<W>, id: ResourceId, unit: UnitId) {
        log::debug!("hunt bound weapon {:?} onto {:?}", id, unit);
        self.weapon = Some(id);
        ctx.tokens.lock(id);
        ctx.world.override_aim(id, unit);
        let now = ctx.time();
        let interval = ctx.settings.aim_refresh_interval;
        self.tasks.after(interval, now, move |ctx: &mut TankContext<W>| {
            ctx.world.refresh_aim(id, ctx.settings.aim_accuracy);
            TaskOutcome::RepeatAfter(ctx.settings.aim_refresh_interval)
        });
    }

    /// Settle the bound weapon: stop the refresh task, drop the aim
    /// override, unlock, and repay the token to wherever it came from.
    fn unbind(&mut self, ctx: &mut TankContext<W>) {
        self.tasks.clear();
        if let Some(id) = self.weapon.take() {
            ctx.world.reset_aim(id);
            ctx.tokens.unlock(id);
            if self.fresh_token || self.borrowed_from.is_some() {
                ctx.tokens.retrieve(id);
            }
            if let Some(donor) = self.borrowed_from.take() {
                ctx.tokens.distribute(donor);
            }
            self.fresh_token = false;
        }
    }
}

impl<W: TankWorld> Default for HuntPlayer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TankWorld> Substate<TankContext<W>> for HuntPlayer<W> {
    fn on_enter(&mut self, ctx: &mut TankContext<W>) {
        log::debug!("hunt activated");
        self.weapon = None;
        self.fresh_token = false;
        self.borrowed_from = None;
        self.rebind_blocked = false;

        if ctx.target().is_none() {
            match ctx.world.nearest_opposing_unit() {
                Some(unit) => ctx.set_target(unit),
                None => {
                    self.rebind_blocked = true;
                    return;
                }
            }
        }
        self.bind_weapon(ctx);
    }

    fn frame_update(&mut self, ctx: &mut TankContext<W>) {
        let now = ctx.time();
        self.tasks.run_due(now, ctx);
        if self.rebind_blocked {
            return;
        }
        let Some(id) = self.weapon else {
            return;
        };
        if ctx.world.weapon_intact(id) {
            return;
        }
        log::debug!("hunt weapon {:?} destroyed, rebinding", id);
        self.unbind(ctx);
        self.bind_weapon(ctx);
    }

    fn on_exit(&mut self, ctx: &mut TankContext<W>) {
        log::debug!("hunt deactivated");
        self.unbind(ctx);
        self.rebind_blocked = false;
    }
}
