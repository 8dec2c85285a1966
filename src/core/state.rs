//! Behavior contract for top-level states.
//!
//! A state is a unit of top-level behavior (patrol, pursue, engage, ...)
//! with enter/exit hooks and per-frame / per-physics-step update hooks. All
//! hooks receive the host-supplied context, which bundles the sensor queries
//! and action commands the behavior needs - states never reach for globals.

/// A unit of top-level behavior driven by the state machine.
///
/// The engine guarantees `on_enter`/`on_exit` are never called redundantly:
/// a transition whose target is already current is a no-op, so
/// implementations do not need to self-guard.
///
/// Typical states are thin adapters around the context: `on_enter` starts
/// continuous behaviors (scheduled tasks, token grants), `on_exit` cancels
/// every one of them unconditionally, and the update hooks are often empty.
///
/// # Example
///
/// ```rust
/// use stratagem::core::State;
///
/// #[derive(Default)]
/// struct Counters {
///     entered: u32,
///     frames: u32,
/// }
///
/// struct Counting;
///
/// impl State<Counters> for Counting {
///     fn on_enter(&mut self, ctx: &mut Counters) {
///         ctx.entered += 1;
///     }
///
///     fn frame_update(&mut self, ctx: &mut Counters) {
///         ctx.frames += 1;
///     }
/// }
/// ```
pub trait State<C>: Send {
    /// Called once when this state becomes current.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called once when this state stops being current.
    ///
    /// Must cancel every continuous behavior started in `on_enter`, with no
    /// partial-cancellation outcomes.
    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Called once per frame tick while current, after transition and
    /// substate evaluation.
    fn frame_update(&mut self, _ctx: &mut C) {}

    /// Called once per fixed physics tick while current.
    fn physics_update(&mut self, _ctx: &mut C) {}
}
