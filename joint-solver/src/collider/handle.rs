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
//! Collider handles
//!
//! Handles are lightweight, non-owning references to colliders stored in a
//! [`ColliderSet`](super::ColliderSet).

use std::fmt;

/// Generational handle to a collider
///
/// Two handles are equal only if both the slot index and the generation
/// match, so a handle to a removed collider never resolves to whatever
/// collider later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle {
    index: u32,
    generation: u32,
}

impl ColliderHandle {
    /// Create a handle from a raw slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        ColliderHandle { index, generation }
    }

    /// A handle that never resolves in any set
    pub fn invalid() -> Self {
        ColliderHandle {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }

    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collider({}, gen: {})", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_creation() {
        let handle = ColliderHandle::new(42, 1);
        assert_eq!(handle.index(), 42);
        assert_eq!(handle.generation(), 1);
    }

    #[test]
    fn test_handle_equality() {
        let h1 = ColliderHandle::new(1, 0);
        let h2 = ColliderHandle::new(1, 0);
        let h3 = ColliderHandle::new(1, 1);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(ColliderHandle::new(3, 2).to_string(), "Collider(3, gen: 2)");
    }
}
