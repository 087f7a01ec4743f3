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
//! Positional constraints
//!
//! A constraint restricts the relative placement of colliders and is enforced
//! by directly rewriting their positions, one constraint at a time. Every
//! concrete constraint implements [`Constraint`] so the solver can drive a
//! heterogeneous list of them through one loop.
//!
//! # Constraint Types
//!
//! - [`Joint`]: the two-body binding shared by all joints, with a default
//!   debug visualization
//! - [`DistanceJoint`]: keeps two colliders at a fixed separation
//!
//! New joint types compose a [`Joint`] and implement [`Constraint`]:
//!
//! ```rust
//! use joint_solver::collider::{ColliderHandle, ColliderSet};
//! use joint_solver::constraint::{Constraint, Joint, SolveStatus};
//! use joint_solver::SolverResult;
//!
//! /// Keeps B level with A on the y axis
//! struct LevelJoint {
//!     joint: Joint,
//! }
//!
//! impl Constraint for LevelJoint {
//!     fn name(&self) -> &str {
//!         "LevelJoint"
//!     }
//!
//!     fn colliders(&self) -> [ColliderHandle; 2] {
//!         self.joint.colliders()
//!     }
//!
//!     fn solve(&mut self, colliders: &mut ColliderSet) -> SolverResult<SolveStatus> {
//!         let (a, b) = colliders.get_pair_mut(self.joint.collider_a(), self.joint.collider_b())?;
//!         let mut target = b.position();
//!         target.y = a.position().y;
//!         b.set_position(target);
//!         Ok(SolveStatus::Applied)
//!     }
//! }
//! ```

mod distance;
mod joint;

pub use distance::DistanceJoint;
pub use joint::{Joint, JOINT_COLOR};

use crate::collider::{ColliderHandle, ColliderSet};
use crate::debug::DebugDraw;
use crate::error::SolverResult;
use std::fmt;

/// Why a constraint left positions untouched during a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The bound colliders coincide, so no correction direction exists
    DegenerateDistance,
    /// Both colliders are immovable, so there is no mass to move
    BothImmovable,
    /// The separation or the corrected positions fall outside the finite `f64` range
    NonFinite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DegenerateDistance => write!(f, "colliders coincide"),
            SkipReason::BothImmovable => write!(f, "both colliders are immovable"),
            SkipReason::NonFinite => write!(f, "correction is not representable"),
        }
    }
}

/// Outcome of a single [`Constraint::solve`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// A correction was written back to the colliders
    Applied,
    /// A degenerate case was detected and positions were left unchanged
    Skipped(SkipReason),
}

/// Capability shared by every constraint the solver can run
///
/// # Contract
///
/// - `solve` reads and writes only the colliders the constraint is bound to
/// - `solve` must not write non-finite positions; degenerate numeric cases
///   are reported as [`SolveStatus::Skipped`] instead
/// - `debug_render` must not mutate physics state
///
/// Constraints do not guarantee convergence on their own. Each
/// implementation documents how it behaves under repeated solving.
pub trait Constraint: Send + Sync {
    /// Get a descriptive name for this constraint
    fn name(&self) -> &str;

    /// Handles of the colliders this constraint is bound to
    fn colliders(&self) -> [ColliderHandle; 2];

    /// Check if the constraint is bound to a specific collider
    fn involves(&self, collider: ColliderHandle) -> bool {
        self.colliders().contains(&collider)
    }

    /// Apply one correction step
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MissingCollider`](crate::SolverError::MissingCollider)
    /// if a bound collider was removed after the constraint was built.
    fn solve(&mut self, colliders: &mut ColliderSet) -> SolverResult<SolveStatus>;

    /// Current constraint error, in world units
    ///
    /// Returns `None` if the constraint cannot measure its own error or a
    /// bound collider is missing.
    fn violation(&self, _colliders: &ColliderSet) -> Option<f64> {
        None
    }

    /// Emit debug geometry for this constraint
    ///
    /// The default draws the straight line between the bound colliders.
    fn debug_render(&self, colliders: &ColliderSet, draw: &mut dyn DebugDraw) {
        let [a, b] = self.colliders();
        if let (Some(ca), Some(cb)) = (colliders.get(a), colliders.get(b)) {
            draw.draw_line(ca.position(), cb.position(), JOINT_COLOR);
        }
    }
}
