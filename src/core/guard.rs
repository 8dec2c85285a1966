//! Guard predicates for transitions and substate conditions.
//!
//! Guards are pure boolean functions over the host context, evaluated once
//! per tick. They close over configuration (ranges, thresholds) but must not
//! mutate the machine or the context.

/// Pure predicate over the host context.
///
/// Guards gate transitions and substate activation. They encapsulate sensor
/// checks ("is the player inside view range?") as side-effect-free reads of
/// the context the host injects into every tick.
///
/// # Example
///
/// ```rust
/// use stratagem::core::Guard;
///
/// struct Sensors {
///     distance_to_player: f32,
/// }
///
/// let view_range = 40.0;
/// let player_in_view = Guard::new(move |s: &Sensors| s.distance_to_player < view_range);
///
/// assert!(player_in_view.check(&Sensors { distance_to_player: 12.0 }));
/// assert!(!player_in_view.check(&Sensors { distance_to_player: 99.0 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic for a given context and free of
    /// side effects; it may be evaluated any number of times per tick.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the predicate against the context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sensors {
        target_visible: bool,
        distance: f32,
    }

    #[test]
    fn guard_reads_context() {
        let guard = Guard::new(|s: &Sensors| s.target_visible);

        assert!(guard.check(&Sensors {
            target_visible: true,
            distance: 0.0,
        }));
        assert!(!guard.check(&Sensors {
            target_visible: false,
            distance: 0.0,
        }));
    }

    #[test]
    fn guard_is_deterministic() {
        let sensors = Sensors {
            target_visible: true,
            distance: 25.0,
        };
        let guard = Guard::new(|s: &Sensors| s.distance < 30.0);

        let result1 = guard.check(&sensors);
        let result2 = guard.check(&sensors);

        assert_eq!(result1, result2);
    }

    #[test]
    fn guard_closes_over_configuration() {
        let threshold = 10.0;
        let guard = Guard::new(move |s: &Sensors| s.distance < threshold);

        assert!(guard.check(&Sensors {
            target_visible: false,
            distance: 5.0,
        }));
        assert!(!guard.check(&Sensors {
            target_visible: false,
            distance: 15.0,
        }));
    }
}
