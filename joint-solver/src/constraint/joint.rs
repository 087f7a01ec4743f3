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
//! Two-body joint binding

use crate::collider::{ColliderHandle, ColliderSet};
use crate::debug::{Color, DebugDraw};
use crate::error::{SolverError, SolverResult};
use crate::math::Vec2;

/// Colour of the default joint line
pub const JOINT_COLOR: Color = Color::WHITE;

/// Binding between exactly two distinct colliders
///
/// `Joint` carries no correction algorithm. Concrete joints embed it, take
/// their collider handles from it, and implement
/// [`Constraint`](super::Constraint) themselves. The handles are fixed at
/// construction; a joint cannot be rebound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Joint {
    collider_a: ColliderHandle,
    collider_b: ColliderHandle,
}

impl Joint {
    /// Bind two colliders
    ///
    /// # Panics
    ///
    /// Panics if either handle does not resolve in `colliders` or both
    /// handles name the same collider. This is a setup error; for fallible
    /// construction, use `try_new`.
    pub fn new(
        colliders: &ColliderSet,
        collider_a: ColliderHandle,
        collider_b: ColliderHandle,
    ) -> Self {
        match Self::try_new(colliders, collider_a, collider_b) {
            Ok(joint) => joint,
            Err(err) => panic!("Joint colliders must be live and distinct: {err}"),
        }
    }

    /// Try to bind two colliders
    ///
    /// # Errors
    ///
    /// - [`SolverError::SelfJoint`] if `collider_a == collider_b`
    /// - [`SolverError::MissingCollider`] for the first handle that does not resolve
    pub fn try_new(
        colliders: &ColliderSet,
        collider_a: ColliderHandle,
        collider_b: ColliderHandle,
    ) -> SolverResult<Self> {
        if collider_a == collider_b {
            return Err(SolverError::SelfJoint(collider_a));
        }
        colliders.try_get(collider_a)?;
        colliders.try_get(collider_b)?;

        Ok(Joint {
            collider_a,
            collider_b,
        })
    }

    /// Handle of the first collider
    pub fn collider_a(&self) -> ColliderHandle {
        self.collider_a
    }

    /// Handle of the second collider
    pub fn collider_b(&self) -> ColliderHandle {
        self.collider_b
    }

    /// Both handles, A first
    pub fn colliders(&self) -> [ColliderHandle; 2] {
        [self.collider_a, self.collider_b]
    }

    /// Current positions of both colliders
    pub fn positions(&self, colliders: &ColliderSet) -> SolverResult<(Vec2, Vec2)> {
        let a = colliders.try_get(self.collider_a)?.position();
        let b = colliders.try_get(self.collider_b)?.position();
        Ok((a, b))
    }

    /// Draw the line between the two colliders in [`JOINT_COLOR`]
    ///
    /// Draws nothing if either collider is gone.
    pub fn debug_render(&self, colliders: &ColliderSet, draw: &mut dyn DebugDraw) {
        if let Ok((a, b)) = self.positions(colliders) {
            draw.draw_line(a, b, JOINT_COLOR);
        }
    }
}
