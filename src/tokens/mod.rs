//! Token-based resource activation.
//!
//! A unit owns more interactable resources (weapons, boiler, throttle) than
//! it can operate at once. The pool holds a fixed number of activation
//! tokens; a resource is operationally active if and only if it currently
//! holds one. States and substates move tokens around on enter/exit to
//! reflect their current intent - release the boiler, arm a gun - and the
//! pool conserves the token count at every step.
//!
//! Grant operations are deliberately non-fatal: distributing into an
//! exhausted pool or an empty category is a silent no-op, and callers that
//! depend on the outcome check availability first.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Handle to one registered resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ResourceId(u32);

struct Resource<T> {
    tag: T,
    available: bool,
    tokened: bool,
    locked: bool,
}

/// A fixed pool of activation tokens distributed across tagged resources.
///
/// # Example
///
/// ```rust
/// use stratagem::tokens::TokenPool;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Gear {
///     Cannon,
///     Boiler,
/// }
///
/// let mut pool = TokenPool::new(1);
/// let cannon = pool.register(Gear::Cannon);
/// let _boiler = pool.register(Gear::Boiler);
///
/// assert_eq!(pool.distribute(Gear::Cannon), Some(cannon));
/// // Pool is exhausted: the boiler grant is a no-op.
/// assert_eq!(pool.distribute(Gear::Boiler), None);
///
/// assert!(pool.retrieve(cannon));
/// assert_eq!(pool.tokens_free(), 1);
/// ```
pub struct TokenPool<T> {
    capacity: usize,
    resources: Vec<Resource<T>>,
}

impl<T> TokenPool<T>
where
    T: Copy + Eq + Hash + Debug,
{
    /// Create a pool holding `capacity` tokens and no resources.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            resources: Vec::new(),
        }
    }

    /// Register a resource under a category tag. Resources start available,
    /// unlocked and untokened.
    pub fn register(&mut self, tag: T) -> ResourceId {
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(Resource {
            tag,
            available: true,
            tokened: false,
            locked: false,
        });
        id
    }

    /// Mark a resource usable or unusable (destroyed, under repair).
    /// Revokes the token of a resource going unavailable.
    pub fn set_available(&mut self, id: ResourceId, available: bool) {
        if let Some(resource) = self.resources.get_mut(id.0 as usize) {
            resource.available = available;
            if !available && resource.tokened {
                resource.tokened = false;
                resource.locked = false;
                log::debug!("token revoked from {:?} (went unavailable)", resource.tag);
            }
        }
    }

    /// Grant one token to the first available untokened resource of the
    /// category. Returns `None` without effect when the pool is exhausted
    /// or no resource is eligible.
    pub fn distribute(&mut self, tag: T) -> Option<ResourceId> {
        if self.tokens_free() == 0 {
            return None;
        }
        let (index, resource) = self
            .resources
            .iter_mut()
            .enumerate()
            .find(|(_, r)| r.tag == tag && r.available && !r.tokened)?;
        resource.tokened = true;
        log::debug!("token granted to {:?}", tag);
        Some(ResourceId(index as u32))
    }

    /// Revoke the token from a resource. Always succeeds if the resource
    /// currently holds one, locked or not.
    pub fn retrieve(&mut self, id: ResourceId) -> bool {
        match self.resources.get_mut(id.0 as usize) {
            Some(resource) if resource.tokened => {
                resource.tokened = false;
                resource.locked = false;
                log::debug!("token retrieved from {:?}", resource.tag);
                true
            }
            _ => false,
        }
    }

    /// Revoke the token from the first holder in the category.
    pub fn retrieve_tag(&mut self, tag: T) -> Option<ResourceId> {
        let id = self.holder_of(tag)?;
        self.retrieve(id);
        Some(id)
    }

    /// Bulk-assign the currently free tokens across categories
    /// proportionally to the weight table.
    ///
    /// Quotas use largest-remainder rounding; each category is granted at
    /// most `min(quota, eligible resources)` tokens and leftovers stay
    /// unallocated. Returns the number of tokens granted.
    pub fn distribute_all_weighted(&mut self, weights: &[(T, u32)]) -> usize {
        let total: u64 = weights.iter().map(|(_, w)| u64::from(*w)).sum();
        let free = self.tokens_free() as u64;
        if total == 0 || free == 0 {
            return 0;
        }

        // Integer quotas first, then leftovers to the largest remainders.
        let mut quotas: Vec<u64> = Vec::with_capacity(weights.len());
        let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(weights.len());
        let mut assigned = 0u64;
        for (index, (_, weight)) in weights.iter().enumerate() {
            let exact = free * u64::from(*weight);
            quotas.push(exact / total);
            remainders.push((index, exact % total));
            assigned += exact / total;
        }
        remainders.sort_by(|a, b| b.1.cmp(&a.1));
        let mut leftover = free.saturating_sub(assigned);
        for (index, remainder) in remainders {
            if leftover == 0 || remainder == 0 {
                break;
            }
            quotas[index] += 1;
            leftover -= 1;
        }

        let mut granted = 0;
        for (index, (tag, _)) in weights.iter().enumerate() {
            for _ in 0..quotas[index] {
                if self.distribute(*tag).is_none() {
                    break;
                }
                granted += 1;
            }
        }
        granted
    }

    /// Revoke every outstanding token. Unforced retrieval leaves locked
    /// tokens in place; forced retrieval reclaims everything. Returns the
    /// number of tokens revoked.
    pub fn retrieve_all(&mut self, forced: bool) -> usize {
        let mut revoked = 0;
        for resource in &mut self.resources {
            if resource.tokened && (forced || !resource.locked) {
                resource.tokened = false;
                resource.locked = false;
                revoked += 1;
            }
        }
        if revoked > 0 {
            log::debug!("retrieved {} tokens (forced: {})", revoked, forced);
        }
        revoked
    }

    /// Pin a token so only [`retrieve`](Self::retrieve) or a forced
    /// [`retrieve_all`](Self::retrieve_all) can revoke it.
    pub fn lock(&mut self, id: ResourceId) {
        if let Some(resource) = self.resources.get_mut(id.0 as usize) {
            if resource.tokened {
                resource.locked = true;
            }
        }
    }

    /// Release a pin set by [`lock`](Self::lock).
    pub fn unlock(&mut self, id: ResourceId) {
        if let Some(resource) = self.resources.get_mut(id.0 as usize) {
            resource.locked = false;
        }
    }

    /// Whether the category has any available resource at all.
    pub fn is_available(&self, tag: T) -> bool {
        self.resources.iter().any(|r| r.tag == tag && r.available)
    }

    /// Whether any resource of the category currently holds a token.
    pub fn has_token(&self, tag: T) -> bool {
        self.resources
            .iter()
            .any(|r| r.tag == tag && r.tokened)
    }

    /// First token holder in the category, if any.
    pub fn holder_of(&self, tag: T) -> Option<ResourceId> {
        self.resources
            .iter()
            .position(|r| r.tag == tag && r.tokened)
            .map(|index| ResourceId(index as u32))
    }

    /// The category a resource was registered under.
    pub fn tag_of(&self, id: ResourceId) -> Option<T> {
        self.resources.get(id.0 as usize).map(|r| r.tag)
    }

    /// Every resource currently holding a token, in registration order.
    pub fn active(&self) -> Vec<ResourceId> {
        self.resources
            .iter()
            .enumerate()
            .filter(|(_, r)| r.tokened)
            .map(|(index, _)| ResourceId(index as u32))
            .collect()
    }

    /// Tokens currently granted to resources.
    pub fn tokens_outstanding(&self) -> usize {
        self.resources.iter().filter(|r| r.tokened).count()
    }

    /// Tokens remaining in the pool.
    pub fn tokens_free(&self) -> usize {
        self.capacity.saturating_sub(self.tokens_outstanding())
    }

    /// Total tokens the pool holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Gear {
        MachineGun,
        Cannon,
        Boiler,
    }

    fn pool_with_one_of_each(capacity: usize) -> (TokenPool<Gear>, ResourceId, ResourceId, ResourceId) {
        let mut pool = TokenPool::new(capacity);
        let gun = pool.register(Gear::MachineGun);
        let cannon = pool.register(Gear::Cannon);
        let boiler = pool.register(Gear::Boiler);
        (pool, gun, cannon, boiler)
    }

    #[test]
    fn distribute_grants_to_first_eligible() {
        let mut pool = TokenPool::new(2);
        let first = pool.register(Gear::Cannon);
        let second = pool.register(Gear::Cannon);

        assert_eq!(pool.distribute(Gear::Cannon), Some(first));
        assert_eq!(pool.distribute(Gear::Cannon), Some(second));
        assert_eq!(pool.tokens_free(), 0);
    }

    #[test]
    fn distribute_is_noop_when_exhausted() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(1);

        assert_eq!(pool.distribute(Gear::MachineGun), Some(gun));
        assert_eq!(pool.distribute(Gear::Cannon), None);
        assert_eq!(pool.tokens_outstanding(), 1);
    }

    #[test]
    fn distribute_is_noop_for_empty_category() {
        let mut pool = TokenPool::new(3);
        pool.register(Gear::Boiler);

        assert_eq!(pool.distribute(Gear::Cannon), None);
        assert_eq!(pool.tokens_free(), 3);
    }

    #[test]
    fn unavailable_resources_are_skipped() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(3);

        pool.set_available(gun, false);
        assert_eq!(pool.distribute(Gear::MachineGun), None);
        assert!(!pool.is_available(Gear::MachineGun));
    }

    #[test]
    fn going_unavailable_drops_the_token() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(3);

        pool.distribute(Gear::MachineGun);
        pool.set_available(gun, false);

        assert!(!pool.has_token(Gear::MachineGun));
        assert_eq!(pool.tokens_free(), 3);
    }

    #[test]
    fn retrieve_succeeds_iff_token_held() {
        let (mut pool, gun, cannon, _) = pool_with_one_of_each(3);

        pool.distribute(Gear::MachineGun);
        assert!(pool.retrieve(gun));
        assert!(!pool.retrieve(gun));
        assert!(!pool.retrieve(cannon));
    }

    #[test]
    fn weighted_distribution_caps_each_category_at_its_resources() {
        // Weights {Weapon: 2, Boiler: 1} over a pool of 3 with exactly one
        // resource per category: one token each, one token left idle.
        let (mut pool, _, _, _) = pool_with_one_of_each(3);

        let granted =
            pool.distribute_all_weighted(&[(Gear::MachineGun, 2), (Gear::Boiler, 1)]);

        assert_eq!(granted, 2);
        assert!(pool.has_token(Gear::MachineGun));
        assert!(pool.has_token(Gear::Boiler));
        assert!(!pool.has_token(Gear::Cannon));
        assert_eq!(pool.tokens_free(), 1);
    }

    #[test]
    fn weighted_distribution_fills_quota_when_resources_allow() {
        let mut pool = TokenPool::new(3);
        pool.register(Gear::MachineGun);
        pool.register(Gear::MachineGun);
        pool.register(Gear::Boiler);

        let granted =
            pool.distribute_all_weighted(&[(Gear::MachineGun, 2), (Gear::Boiler, 1)]);

        assert_eq!(granted, 3);
        assert_eq!(pool.tokens_free(), 0);
    }

    #[test]
    fn weighted_distribution_with_zero_total_weight_is_noop() {
        let (mut pool, _, _, _) = pool_with_one_of_each(3);
        assert_eq!(pool.distribute_all_weighted(&[(Gear::Cannon, 0)]), 0);
        assert_eq!(pool.tokens_outstanding(), 0);
    }

    #[test]
    fn retrieve_all_forced_empties_the_active_set() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(3);
        pool.distribute_all_weighted(&[(Gear::MachineGun, 1), (Gear::Cannon, 1), (Gear::Boiler, 1)]);
        pool.lock(gun);

        pool.retrieve_all(true);

        assert!(pool.active().is_empty());
        assert_eq!(pool.tokens_free(), 3);
    }

    #[test]
    fn unforced_retrieval_spares_locked_tokens() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(3);
        pool.distribute(Gear::MachineGun);
        pool.distribute(Gear::Boiler);
        pool.lock(gun);

        let revoked = pool.retrieve_all(false);

        assert_eq!(revoked, 1);
        assert!(pool.has_token(Gear::MachineGun));
        assert!(!pool.has_token(Gear::Boiler));
    }

    #[test]
    fn explicit_retrieve_ignores_lock() {
        let (mut pool, gun, _, _) = pool_with_one_of_each(3);
        pool.distribute(Gear::MachineGun);
        pool.lock(gun);

        assert!(pool.retrieve(gun));
        assert!(!pool.has_token(Gear::MachineGun));
    }

    #[test]
    fn token_count_is_conserved() {
        let (mut pool, gun, _, boiler) = pool_with_one_of_each(2);

        assert_eq!(pool.tokens_free() + pool.tokens_outstanding(), 2);
        pool.distribute(Gear::MachineGun);
        pool.distribute(Gear::Boiler);
        assert_eq!(pool.tokens_free() + pool.tokens_outstanding(), 2);
        pool.retrieve(gun);
        assert_eq!(pool.tokens_free() + pool.tokens_outstanding(), 2);
        pool.retrieve(boiler);
        assert_eq!(pool.tokens_free() + pool.tokens_outstanding(), 2);
    }

    #[test]
    fn holder_and_tag_queries() {
        let (mut pool, _, cannon, _) = pool_with_one_of_each(3);

        assert_eq!(pool.holder_of(Gear::Cannon), None);
        pool.distribute(Gear::Cannon);
        assert_eq!(pool.holder_of(Gear::Cannon), Some(cannon));
        assert_eq!(pool.tag_of(cannon), Some(Gear::Cannon));
    }

    #[test]
    fn retrieve_tag_revokes_first_holder() {
        let mut pool = TokenPool::new(2);
        let first = pool.register(Gear::Cannon);
        pool.register(Gear::Cannon);
        pool.distribute(Gear::Cannon);
        pool.distribute(Gear::Cannon);

        assert_eq!(pool.retrieve_tag(Gear::Cannon), Some(first));
        assert_eq!(pool.tokens_outstanding(), 1);
    }
}
