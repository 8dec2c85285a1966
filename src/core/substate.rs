//! Behavior contract for nested substates.

use super::state::State;

/// A nested behavior that runs inside one or more compatible parent states.
///
/// Substates share the parent's lifecycle shape (enter/exit plus the two
/// update cadences) but are activated by their own enter/exit condition sets
/// rather than by transitions. At most one substate is active across the
/// whole machine at any tick.
///
/// `pause_parent` is a hint, not a mechanism: the engine dispatches the
/// parent state's updates unconditionally even while a substate is active
/// (see [`StateMachine`](crate::machine::StateMachine)). A parent that wants
/// to stand down while its substate works must check the flag itself, via
/// [`StateMachine::substate_pauses_parent`](crate::machine::StateMachine::substate_pauses_parent)
/// or a shared context field.
pub trait Substate<C>: Send {
    /// Called once when this substate activates.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called once when this substate deactivates, whether by its own exit
    /// conditions or by a state change to an incompatible parent.
    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Called once per frame tick while active, after the parent state's
    /// frame update.
    fn frame_update(&mut self, _ctx: &mut C) {}

    /// Called once per fixed physics tick while active.
    fn physics_update(&mut self, _ctx: &mut C) {}

    /// Whether the parent state should suspend its own updates while this
    /// substate is active. The engine never enforces this.
    fn pause_parent(&self) -> bool {
        false
    }
}

/// Adapter running any [`State`] as a [`Substate`].
///
/// Useful when a behavior is written once and mounted either at the top
/// level or nested under a parent.
pub struct AsSubstate<S> {
    inner: S,
    pause_parent: bool,
}

impl<S> AsSubstate<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pause_parent: false,
        }
    }

    /// Set the pause-parent hint.
    pub fn pausing_parent(mut self, pause: bool) -> Self {
        self.pause_parent = pause;
        self
    }
}

impl<C, S: State<C>> Substate<C> for AsSubstate<S> {
    fn on_enter(&mut self, ctx: &mut C) {
        self.inner.on_enter(ctx);
    }

    fn on_exit(&mut self, ctx: &mut C) {
        self.inner.on_exit(ctx);
    }

    fn frame_update(&mut self, ctx: &mut C) {
        self.inner.frame_update(ctx);
    }

    fn physics_update(&mut self, ctx: &mut C) {
        self.inner.physics_update(ctx);
    }

    fn pause_parent(&self) -> bool {
        self.pause_parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        events: Vec<&'static str>,
    }

    struct Inner;

    impl State<Log> for Inner {
        fn on_enter(&mut self, ctx: &mut Log) {
            ctx.events.push("enter");
        }

        fn frame_update(&mut self, ctx: &mut Log) {
            ctx.events.push("frame");
        }
    }

    #[test]
    fn pause_parent_defaults_to_false() {
        struct Quiet;
        impl Substate<Log> for Quiet {}

        assert!(!Quiet.pause_parent());
    }

    #[test]
    fn as_substate_forwards_hooks() {
        let mut log = Log::default();
        let mut sub = AsSubstate::new(Inner);

        sub.on_enter(&mut log);
        sub.frame_update(&mut log);

        assert_eq!(log.events, vec!["enter", "frame"]);
        assert!(!sub.pause_parent());
    }

    #[test]
    fn as_substate_carries_pause_hint() {
        let sub = AsSubstate::new(Inner).pausing_parent(true);
        assert!(Substate::<Log>::pause_parent(&sub));
    }
}
