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
//! Colliders and the arena that owns them
//!
//! The solver never owns colliders. Constraints refer to them through
//! [`ColliderHandle`]s that index into a [`ColliderSet`]:
//! - Handles are `Copy` and carry a generation counter
//! - Removing a collider invalidates every outstanding handle to it
//! - Lookups through a stale handle fail instead of aliasing a new collider

mod body;
mod handle;
mod set;

pub use body::{Collider, Mass};
pub use handle::ColliderHandle;
pub use set::ColliderSet;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_set_creation() {
        let set = ColliderSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_collider_insertion() {
        let mut set = ColliderSet::new();
        let handle = set.insert(Collider::new(Vec2::new(1.0, 2.0), Mass::new(1.0)));
        assert_eq!(set.len(), 1);
        assert!(set.contains(handle));
    }
}
