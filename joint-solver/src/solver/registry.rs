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
//! Registry of active constraints
//!
//! Solve order is insertion order. Removing a constraint keeps the relative
//! order of the others, so results stay reproducible across runs.

use crate::collider::ColliderHandle;
use crate::constraint::Constraint;
use crate::error::{SolverError, SolverResult};
use std::fmt;

/// Identifier of a registered constraint
///
/// Ids are never reused within one [`ConstraintSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(u64);

impl ConstraintId {
    /// Create a ConstraintId from a raw u64 value
    pub fn new(id: u64) -> Self {
        ConstraintId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint({})", self.0)
    }
}

/// Ordered collection of boxed constraints
#[derive(Default)]
pub struct ConstraintSet {
    next_id: u64,
    entries: Vec<(ConstraintId, Box<dyn Constraint>)>,
}

impl ConstraintSet {
    /// Create an empty set
    pub fn new() -> Self {
        ConstraintSet {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a constraint at the end of the solve order
    pub fn insert(&mut self, constraint: Box<dyn Constraint>) -> ConstraintId {
        let id = ConstraintId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, constraint));
        id
    }

    /// Remove a constraint
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownConstraint`] if `id` is not registered.
    pub fn remove(&mut self, id: ConstraintId) -> SolverResult<Box<dyn Constraint>> {
        let index = self.position(id).ok_or(SolverError::UnknownConstraint(id))?;
        Ok(self.entries.remove(index).1)
    }

    /// Remove every constraint bound to `collider`, returning how many were dropped
    pub fn remove_involving(&mut self, collider: ColliderHandle) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, c)| !c.involves(collider));
        before - self.entries.len()
    }

    /// Get a constraint by id
    pub fn get(&self, id: ConstraintId) -> Option<&(dyn Constraint + 'static)> {
        self.position(id).map(|index| self.entries[index].1.as_ref())
    }

    /// Get a mutable constraint by id
    pub fn get_mut(&mut self, id: ConstraintId) -> Option<&mut (dyn Constraint + 'static)> {
        match self.position(id) {
            Some(index) => Some(self.entries[index].1.as_mut()),
            None => None,
        }
    }

    /// Check if a constraint is registered
    pub fn contains(&self, id: ConstraintId) -> bool {
        self.position(id).is_some()
    }

    /// Number of registered constraints
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no constraints are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all constraints
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate in solve order
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &(dyn Constraint + 'static))> {
        self.entries.iter().map(|(id, c)| (*id, c.as_ref()))
    }

    pub(crate) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (ConstraintId, &mut Box<dyn Constraint>)> {
        self.entries.iter_mut().map(|(id, c)| (*id, c))
    }

    fn position(&self, id: ConstraintId) -> Option<usize> {
        // Ids are handed out in increasing order and removal preserves order
        self.entries.binary_search_by_key(&id, |(entry_id, _)| *entry_id).ok()
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, c)| (id, c.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Collider, ColliderSet, Mass};
    use crate::constraint::DistanceJoint;
    use crate::math::Vec2;

    fn setup() -> (ColliderSet, Vec<ColliderHandle>) {
        let mut colliders = ColliderSet::new();
        let handles = (0..3)
            .map(|i| colliders.insert(Collider::new(Vec2::new(i as f64, 0.0), Mass::new(1.0))))
            .collect();
        (colliders, handles)
    }

    fn link(colliders: &ColliderSet, a: ColliderHandle, b: ColliderHandle) -> Box<dyn Constraint> {
        Box::new(DistanceJoint::new(colliders, a, b, 1.0, 1.0))
    }

    #[test]
    fn test_insert_and_remove() {
        let (colliders, h) = setup();
        let mut set = ConstraintSet::new();

        let first = set.insert(link(&colliders, h[0], h[1]));
        let second = set.insert(link(&colliders, h[1], h[2]));
        assert_eq!(set.len(), 2);
        assert_ne!(first, second);

        assert!(set.remove(first).is_ok());
        assert!(!set.contains(first));
        assert!(set.contains(second));
        assert!(matches!(
            set.remove(first),
            Err(SolverError::UnknownConstraint(id)) if id == first
        ));
    }

    #[test]
    fn test_order_is_stable_after_removal() {
        let (colliders, h) = setup();
        let mut set = ConstraintSet::new();

        let ids: Vec<ConstraintId> = (0..4)
            .map(|_| set.insert(link(&colliders, h[0], h[1])))
            .collect();
        set.remove(ids[1]).unwrap();

        let order: Vec<ConstraintId> = set.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3]]);

        // Ids are not reused
        let fresh = set.insert(link(&colliders, h[0], h[1]));
        assert!(fresh > ids[3]);
    }

    #[test]
    fn test_remove_involving() {
        let (colliders, h) = setup();
        let mut set = ConstraintSet::new();
        set.insert(link(&colliders, h[0], h[1]));
        set.insert(link(&colliders, h[1], h[2]));
        set.insert(link(&colliders, h[0], h[2]));

        assert_eq!(set.remove_involving(h[1]), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.remove_involving(h[1]), 0);
    }

    #[test]
    fn test_get_and_get_mut() {
        let (colliders, h) = setup();
        let mut set = ConstraintSet::new();
        let id = set.insert(link(&colliders, h[0], h[1]));

        assert_eq!(set.get(id).map(|c| c.name()), Some("DistanceJoint"));
        assert!(set.get_mut(id).is_some());
        assert!(set.get(ConstraintId::new(99)).is_none());
    }
}
