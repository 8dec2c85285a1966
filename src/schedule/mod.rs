//! Cancellable repeating background tasks.
//!
//! States and substates model their continuous behaviors (movement
//! heartbeats, target refresh, token redistribution) as scheduled tasks:
//! each task waits an externally-determined delay, performs one decision
//! step against the context, and either re-arms itself or finishes. A
//! `Schedule` is owned by the state that started its tasks, so cancelling
//! everything on exit is a single `clear()` - total and immediate, with no
//! partial-cancellation outcomes.
//!
//! Time is whatever clock the host advances; the schedule only compares
//! `now` against each task's next fire time.

/// What a task wants to happen after it runs.
pub enum TaskOutcome {
    /// Re-arm the task to fire again after the given delay.
    RepeatAfter(f64),
    /// Remove the task from the schedule.
    Done,
}

struct Task<C> {
    next_fire: f64,
    action: Box<dyn FnMut(&mut C) -> TaskOutcome + Send>,
}

/// An ordered list of pending tasks over the host context.
///
/// # Example
///
/// ```rust
/// use stratagem::schedule::{Schedule, TaskOutcome};
///
/// #[derive(Default)]
/// struct World {
///     beats: u32,
/// }
///
/// let mut schedule = Schedule::new();
/// schedule.after(1.0, 0.0, |w: &mut World| {
///     w.beats += 1;
///     TaskOutcome::RepeatAfter(1.0)
/// });
///
/// let mut world = World::default();
/// schedule.run_due(0.5, &mut world);
/// assert_eq!(world.beats, 0);
///
/// schedule.run_due(1.0, &mut world);
/// assert_eq!(world.beats, 1);
/// ```
pub struct Schedule<C> {
    tasks: Vec<Task<C>>,
}

impl<C> Default for Schedule<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Schedule<C> {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Enqueue a task to first fire `delay` after `now`.
    ///
    /// A zero delay fires on the next `run_due` call.
    pub fn after<F>(&mut self, delay: f64, now: f64, action: F)
    where
        F: FnMut(&mut C) -> TaskOutcome + Send + 'static,
    {
        self.tasks.push(Task {
            next_fire: now + delay,
            action: Box::new(action),
        });
    }

    /// Run every task whose fire time has arrived, at most once each.
    ///
    /// Tasks returning [`TaskOutcome::RepeatAfter`] are re-armed relative to
    /// `now`; tasks returning [`TaskOutcome::Done`] are removed.
    pub fn run_due(&mut self, now: f64, ctx: &mut C) {
        self.tasks.retain_mut(|task| {
            if task.next_fire > now {
                return true;
            }
            match (task.action)(ctx) {
                TaskOutcome::RepeatAfter(delay) => {
                    task.next_fire = now + delay;
                    true
                }
                TaskOutcome::Done => false,
            }
        });
    }

    /// Cancel every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
