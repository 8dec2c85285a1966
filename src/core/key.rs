//! Stable identity for states and substates.
//!
//! The engine keys its transition and substate tables by a `StateKey` value
//! supplied at registration time, so behavior objects never need to know
//! their own identity and two registrations of the same key are
//! interchangeable for lookup purposes.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Key type identifying a state or substate within one machine.
///
/// Keys are small copyable values - in practice an enum with one variant per
/// behavior, generated by the [`state_key!`](crate::state_key) macro.
///
/// # Required Traits
///
/// - `Copy + Eq + Hash`: keys index the engine's lookup tables
/// - `Debug`: keys appear in errors and logs
/// - `Serialize` + `Deserialize`: keys appear in history and snapshots
///
/// # Example
///
/// ```rust
/// use stratagem::core::StateKey;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum TankState {
///     Patrol,
///     Pursue,
/// }
///
/// impl StateKey for TankState {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Patrol => "Patrol",
///             Self::Pursue => "Pursue",
///         }
///     }
/// }
///
/// assert_eq!(TankState::Patrol.name(), "Patrol");
/// ```
pub trait StateKey:
    Copy
    + Eq
    + Hash
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
    + Send
    + Sync
    + 'static
{
    /// Get the key's name for display/logging.
    fn name(&self) -> &'static str;
}
