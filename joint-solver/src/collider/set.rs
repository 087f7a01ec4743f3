// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Collider arena
//!
//! Colliders live in a dense vector of slots. Removing a collider empties its
//! slot and bumps the slot generation; the slot goes on a free list and is
//! handed out again by the next insertion.

use crate::collider::{Collider, ColliderHandle};
use crate::error::{SolverError, SolverResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    collider: Option<Collider>,
}

/// Arena owning every collider the solver can touch
///
/// # Examples
///
/// ```
/// use joint_solver::collider::{Collider, ColliderSet, Mass};
/// use joint_solver::math::Vec2;
///
/// let mut colliders = ColliderSet::new();
/// let handle = colliders.insert(Collider::new(Vec2::new(1.0, 0.0), Mass::new(2.0)));
/// assert_eq!(colliders.get(handle).map(|c| c.position()), Some(Vec2::new(1.0, 0.0)));
///
/// colliders.remove(handle);
/// assert!(colliders.get(handle).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ColliderSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new set with room for `capacity` colliders
    pub fn with_capacity(capacity: usize) -> Self {
        ColliderSet {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a collider and return its handle
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.collider = Some(collider);
            return ColliderHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            collider: Some(collider),
        });
        ColliderHandle::new(index, 0)
    }

    /// Remove a collider
    ///
    /// Every handle to it becomes stale. Returns `None` if the handle was
    /// already stale.
    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let slot = self.slot_mut(handle)?;
        let collider = slot.collider.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(handle.index());
        self.len -= 1;
        Some(collider)
    }

    /// Check if a handle resolves to a live collider
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Get a collider by handle
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.collider.as_ref())
    }

    /// Get a mutable collider by handle
    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.slot_mut(handle).and_then(|slot| slot.collider.as_mut())
    }

    /// Get a collider, failing with [`SolverError::MissingCollider`] for a stale handle
    pub fn try_get(&self, handle: ColliderHandle) -> SolverResult<&Collider> {
        self.get(handle).ok_or(SolverError::MissingCollider(handle))
    }

    /// Borrow two distinct colliders mutably at the same time
    ///
    /// # Errors
    ///
    /// Returns `SelfJoint` if both handles are the same, and `MissingCollider`
    /// for the first handle that does not resolve.
    pub fn get_pair_mut(
        &mut self,
        a: ColliderHandle,
        b: ColliderHandle,
    ) -> SolverResult<(&mut Collider, &mut Collider)> {
        if a == b {
            return Err(SolverError::SelfJoint(a));
        }
        if !self.contains(a) {
            return Err(SolverError::MissingCollider(a));
        }
        if !self.contains(b) {
            return Err(SolverError::MissingCollider(b));
        }

        let (ia, ib) = (a.index() as usize, b.index() as usize);
        // Equal indices with different generations cannot both be live
        let (first, second) = if ia < ib {
            let (left, right) = self.slots.split_at_mut(ib);
            (&mut left[ia], &mut right[0])
        } else {
            let (left, right) = self.slots.split_at_mut(ia);
            (&mut right[0], &mut left[ib])
        };

        match (first.collider.as_mut(), second.collider.as_mut()) {
            (Some(ca), Some(cb)) => Ok((ca, cb)),
            (None, _) => Err(SolverError::MissingCollider(a)),
            (_, None) => Err(SolverError::MissingCollider(b)),
        }
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set holds no colliders
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every collider
    ///
    /// Generations are kept so handles issued before the clear stay stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.collider.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }

    /// Iterate over live colliders and their handles
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.collider
                .as_ref()
                .map(|c| (ColliderHandle::new(index as u32, slot.generation), c))
        })
    }

    /// Iterate mutably over live colliders
    pub fn colliders_mut(&mut self) -> impl Iterator<Item = &mut Collider> {
        self.slots.iter_mut().filter_map(|slot| slot.collider.as_mut())
    }

    /// Parallel mutable iteration over live colliders
    #[cfg(feature = "parallel")]
    pub fn par_colliders_mut(&mut self) -> impl ParallelIterator<Item = &mut Collider> {
        self.slots.par_iter_mut().filter_map(|slot| slot.collider.as_mut())
    }

    fn slot_mut(&mut self, handle: ColliderHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Mass;
    use crate::math::Vec2;

    fn collider_at(x: f64) -> Collider {
        Collider::new(Vec2::new(x, 0.0), Mass::new(1.0))
    }

    #[test]
    fn test_collider_lifecycle() {
        let mut set = ColliderSet::new();

        let c1 = set.insert(collider_at(1.0));
        let c2 = set.insert(collider_at(2.0));
        assert_eq!(set.len(), 2);
        assert!(set.contains(c1));
        assert!(set.contains(c2));

        assert!(set.remove(c1).is_some());
        assert_eq!(set.len(), 1);
        assert!(!set.contains(c1));
        assert!(set.contains(c2));

        // Second removal through the stale handle is a no-op
        assert!(set.remove(c1).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let mut set = ColliderSet::new();

        let old = set.insert(collider_at(1.0));
        set.remove(old);
        let new = set.insert(collider_at(7.0));

        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(set.get(old).is_none());
        assert_eq!(set.get(new).map(|c| c.position().x), Some(7.0));
    }

    #[test]
    fn test_try_get_reports_stale_handle() {
        let mut set = ColliderSet::new();
        let handle = set.insert(collider_at(0.0));
        set.remove(handle);

        assert_eq!(set.try_get(handle), Err(SolverError::MissingCollider(handle)));
        assert_eq!(
            set.try_get(ColliderHandle::invalid()),
            Err(SolverError::MissingCollider(ColliderHandle::invalid()))
        );
    }

    #[test]
    fn test_get_pair_mut_both_orders() {
        let mut set = ColliderSet::new();
        let a = set.insert(collider_at(1.0));
        let b = set.insert(collider_at(2.0));

        {
            let (ca, cb) = set.get_pair_mut(a, b).unwrap();
            assert_eq!(ca.position().x, 1.0);
            assert_eq!(cb.position().x, 2.0);
            ca.set_position(Vec2::new(10.0, 0.0));
        }
        {
            let (cb, ca) = set.get_pair_mut(b, a).unwrap();
            assert_eq!(cb.position().x, 2.0);
            assert_eq!(ca.position().x, 10.0);
        }
    }

    #[test]
    fn test_get_pair_mut_errors() {
        let mut set = ColliderSet::new();
        let a = set.insert(collider_at(1.0));
        let b = set.insert(collider_at(2.0));

        assert_eq!(set.get_pair_mut(a, a).err(), Some(SolverError::SelfJoint(a)));

        set.remove(b);
        assert_eq!(set.get_pair_mut(a, b).err(), Some(SolverError::MissingCollider(b)));
        assert_eq!(set.get_pair_mut(b, a).err(), Some(SolverError::MissingCollider(b)));
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut set = ColliderSet::new();
        let a = set.insert(collider_at(1.0));
        set.insert(collider_at(2.0));

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(a));

        let reused = set.insert(collider_at(3.0));
        assert!(set.contains(reused));
        assert!(!set.contains(a));
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut set = ColliderSet::new();
        let a = set.insert(collider_at(1.0));
        let b = set.insert(collider_at(2.0));
        let c = set.insert(collider_at(3.0));
        set.remove(b);

        let handles: Vec<ColliderHandle> = set.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, vec![a, c]);
        assert_eq!(set.colliders_mut().count(), 2);
    }
}
