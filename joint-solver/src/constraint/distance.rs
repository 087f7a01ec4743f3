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
//! Fixed-distance joint
//!
//! The joint pulls or pushes two colliders toward a resting separation.
//! Each solve computes the fractional error of the current separation and
//! splits a stiffness-scaled correction between the colliders by inverse
//! mass:
//!
//! ```text
//! d        = |pA - pB|
//! axis     = (pA - pB) / d
//! sA       = wA / (wA + wB) * stiffness
//! sB       = stiffness - sA
//! pA'      = pA + axis * (rest - d) * sA
//! pB'      = pB - axis * (rest - d) * sB
//! ```
//!
//! With equal masses the separation error shrinks by a factor of
//! `1 - stiffness` per solve, so a stiffness of 1 reaches the resting
//! distance in a single step.

use super::{Constraint, Joint, SkipReason, SolveStatus};
use crate::collider::{ColliderHandle, ColliderSet};
use crate::debug::{Color, DebugDraw};
use crate::error::{SolverError, SolverResult};
use crate::math::clamp;
use std::fmt;
use tracing::{debug, trace, warn};

/// Colour of the rest-length marker drawn by [`DistanceJoint::debug_render`]
pub const REST_LENGTH_COLOR: Color = Color::YELLOW;

/// Keeps two colliders at a fixed separation
///
/// # Examples
///
/// ```
/// use joint_solver::collider::{Collider, ColliderSet, Mass};
/// use joint_solver::constraint::{Constraint, DistanceJoint};
/// use joint_solver::math::Vec2;
///
/// let mut colliders = ColliderSet::new();
/// let a = colliders.insert(Collider::new(Vec2::new(0.0, 0.0), Mass::new(1.0)));
/// let b = colliders.insert(Collider::new(Vec2::new(10.0, 0.0), Mass::new(1.0)));
///
/// let mut joint = DistanceJoint::new(&colliders, a, b, 5.0, 1.0);
/// joint.solve(&mut colliders).unwrap();
///
/// assert_eq!(colliders.get(a).unwrap().position(), Vec2::new(2.5, 0.0));
/// assert_eq!(colliders.get(b).unwrap().position(), Vec2::new(7.5, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceJoint {
    joint: Joint,
    resting_distance: f64,
    stiffness: f64,
}

impl DistanceJoint {
    /// Separation at or below which the correction direction is undefined
    pub const MIN_SEPARATION: f64 = 1e-10;

    /// Create a distance joint
    ///
    /// # Panics
    ///
    /// Panics if the colliders are not live and distinct, or if a parameter
    /// is rejected by [`set_resting_distance`](Self::set_resting_distance) or
    /// [`set_stiffness`](Self::set_stiffness). For fallible construction, use
    /// `try_new`.
    pub fn new(
        colliders: &ColliderSet,
        collider_a: ColliderHandle,
        collider_b: ColliderHandle,
        resting_distance: f64,
        stiffness: f64,
    ) -> Self {
        match Self::try_new(colliders, collider_a, collider_b, resting_distance, stiffness) {
            Ok(joint) => joint,
            Err(err) => panic!("Invalid distance joint: {err}"),
        }
    }

    /// Try to create a distance joint
    ///
    /// # Errors
    ///
    /// Fails with the errors of [`Joint::try_new`], or with
    /// [`SolverError::InvalidParameter`] for a rejected parameter.
    pub fn try_new(
        colliders: &ColliderSet,
        collider_a: ColliderHandle,
        collider_b: ColliderHandle,
        resting_distance: f64,
        stiffness: f64,
    ) -> SolverResult<Self> {
        let joint = Joint::try_new(colliders, collider_a, collider_b)?;
        let mut distance_joint = DistanceJoint {
            joint,
            resting_distance: 0.0,
            stiffness: 1.0,
        };
        distance_joint.set_resting_distance(resting_distance)?;
        distance_joint.set_stiffness(stiffness)?;
        Ok(distance_joint)
    }

    /// Create a distance joint whose resting distance is the current separation
    pub fn from_current(
        colliders: &ColliderSet,
        collider_a: ColliderHandle,
        collider_b: ColliderHandle,
        stiffness: f64,
    ) -> SolverResult<Self> {
        let joint = Joint::try_new(colliders, collider_a, collider_b)?;
        let (a, b) = joint.positions(colliders)?;
        Self::try_new(colliders, collider_a, collider_b, a.distance(b), stiffness)
    }

    /// The underlying two-body binding
    pub fn joint(&self) -> &Joint {
        &self.joint
    }

    /// Target separation
    pub fn resting_distance(&self) -> f64 {
        self.resting_distance
    }

    /// Set the target separation
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidParameter`] and keeps the previous value
    /// if `distance` is negative, NaN or infinite.
    pub fn set_resting_distance(&mut self, distance: f64) -> SolverResult<()> {
        if !(distance >= 0.0 && distance.is_finite()) {
            return Err(SolverError::InvalidParameter {
                name: "resting_distance",
                value: distance,
            });
        }
        self.resting_distance = distance;
        Ok(())
    }

    /// Fraction of the ideal correction applied per solve, in `[0, 1]`
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Set the stiffness
    ///
    /// Finite values outside `[0, 1]` would overcorrect or invert the
    /// correction, so they are clamped into range with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidParameter`] and keeps the previous value
    /// if `stiffness` is NaN or infinite.
    pub fn set_stiffness(&mut self, stiffness: f64) -> SolverResult<()> {
        if !stiffness.is_finite() {
            return Err(SolverError::InvalidParameter {
                name: "stiffness",
                value: stiffness,
            });
        }

        let clamped = clamp(stiffness, 0.0, 1.0);
        if clamped != stiffness {
            warn!(
                requested = stiffness,
                applied = clamped,
                "distance joint stiffness outside [0, 1], clamping"
            );
        }
        self.stiffness = clamped;
        Ok(())
    }

    /// Current separation between the two colliders
    pub fn current_distance(&self, colliders: &ColliderSet) -> SolverResult<f64> {
        let (a, b) = self.joint.positions(colliders)?;
        Ok(a.distance(b))
    }
}

impl Constraint for DistanceJoint {
    fn name(&self) -> &str {
        "DistanceJoint"
    }

    fn colliders(&self) -> [ColliderHandle; 2] {
        self.joint.colliders()
    }

    fn solve(&mut self, colliders: &mut ColliderSet) -> SolverResult<SolveStatus> {
        let (a, b) = colliders.get_pair_mut(self.joint.collider_a(), self.joint.collider_b())?;

        // Both updates below read this one snapshot
        let pos_diff = a.position() - b.position();
        let distance = pos_diff.length();

        if !distance.is_finite() {
            warn!(
                collider_a = %self.joint.collider_a(),
                collider_b = %self.joint.collider_b(),
                "skipping distance joint whose separation is not finite"
            );
            return Ok(SolveStatus::Skipped(SkipReason::NonFinite));
        }
        if distance <= Self::MIN_SEPARATION {
            debug!(
                collider_a = %self.joint.collider_a(),
                collider_b = %self.joint.collider_b(),
                distance,
                "skipping distance joint with coincident colliders"
            );
            return Ok(SolveStatus::Skipped(SkipReason::DegenerateDistance));
        }

        let inv_mass_a = a.inverse_mass();
        let inv_mass_b = b.inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum == 0.0 {
            trace!(
                collider_a = %self.joint.collider_a(),
                collider_b = %self.joint.collider_b(),
                "skipping distance joint between immovable colliders"
            );
            return Ok(SolveStatus::Skipped(SkipReason::BothImmovable));
        }

        // Same as pos_diff * (rest - d) / d, but bounded by |rest - d| for
        // tiny separations
        let axis = pos_diff / distance;
        let correction = axis * (self.resting_distance - distance);
        let scalar_a = (inv_mass_a / inv_mass_sum) * self.stiffness;
        let scalar_b = self.stiffness - scalar_a;

        let next_a = a.position() + correction * scalar_a;
        let next_b = b.position() - correction * scalar_b;
        if !(next_a.is_finite() && next_b.is_finite()) {
            warn!(
                collider_a = %self.joint.collider_a(),
                collider_b = %self.joint.collider_b(),
                resting_distance = self.resting_distance,
                distance,
                "distance joint correction overflows, leaving colliders in place"
            );
            return Ok(SolveStatus::Skipped(SkipReason::NonFinite));
        }

        a.set_position(next_a);
        b.set_position(next_b);

        Ok(SolveStatus::Applied)
    }

    fn violation(&self, colliders: &ColliderSet) -> Option<f64> {
        self.current_distance(colliders)
            .ok()
            .map(|distance| (distance - self.resting_distance).abs())
    }

    /// Draws the joint line, then a marker of the resting length centred on
    /// the midpoint of the joint
    fn debug_render(&self, colliders: &ColliderSet, draw: &mut dyn DebugDraw) {
        self.joint.debug_render(colliders, draw);

        let Ok((a, b)) = self.joint.positions(colliders) else {
            return;
        };
        if let Some(axis) = (a - b).normalized() {
            let mid = b.lerp(a, 0.5);
            let half = axis * (self.resting_distance * 0.5);
            draw.draw_line(mid - half, mid + half, REST_LENGTH_COLOR);
        }
    }
}

impl fmt::Display for DistanceJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DistanceJoint({} -> {}, rest: {}, stiffness: {})",
            self.joint.collider_a(),
            self.joint.collider_b(),
            self.resting_distance,
            self.stiffness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Collider, Mass};
    use crate::debug::LineRecorder;
    use crate::math::Vec2;

    fn pair(
        pa: Vec2,
        ma: Mass,
        pb: Vec2,
        mb: Mass,
    ) -> (ColliderSet, ColliderHandle, ColliderHandle) {
        let mut set = ColliderSet::new();
        let a = set.insert(Collider::new(pa, ma));
        let b = set.insert(Collider::new(pb, mb));
        (set, a, b)
    }

    fn position(set: &ColliderSet, handle: ColliderHandle) -> Vec2 {
        set.get(handle).unwrap().position()
    }

    #[test]
    fn test_equal_mass_exact_convergence() {
        let (mut set, a, b) = pair(
            Vec2::new(0.0, 0.0),
            Mass::new(1.0),
            Vec2::new(10.0, 0.0),
            Mass::new(1.0),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);

        assert_eq!(joint.solve(&mut set), Ok(SolveStatus::Applied));
        assert_eq!(position(&set, a), Vec2::new(2.5, 0.0));
        assert_eq!(position(&set, b), Vec2::new(7.5, 0.0));
        assert_eq!(joint.current_distance(&set), Ok(5.0));
    }

    #[test]
    fn test_pushes_apart_when_too_close() {
        let (mut set, a, b) = pair(
            Vec2::new(0.0, 0.0),
            Mass::new(1.0),
            Vec2::new(0.0, 2.0),
            Mass::new(1.0),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 4.0, 1.0);
        joint.solve(&mut set).unwrap();

        assert_eq!(position(&set, a), Vec2::new(0.0, -1.0));
        assert_eq!(position(&set, b), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_immovable_collider_stays_put() {
        let (mut set, a, b) = pair(
            Vec2::new(0.0, 0.0),
            Mass::immovable(),
            Vec2::new(10.0, 0.0),
            Mass::new(1.0),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);
        joint.solve(&mut set).unwrap();

        assert_eq!(position(&set, a), Vec2::new(0.0, 0.0));
        assert_eq!(position(&set, b), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_skips_when_both_immovable() {
        let (mut set, a, b) = pair(
            Vec2::new(0.0, 0.0),
            Mass::immovable(),
            Vec2::new(10.0, 0.0),
            Mass::immovable(),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);

        assert_eq!(
            joint.solve(&mut set),
            Ok(SolveStatus::Skipped(SkipReason::BothImmovable))
        );
        assert_eq!(position(&set, b), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_skips_coincident_colliders() {
        let (mut set, a, b) = pair(
            Vec2::new(1.0, 1.0),
            Mass::new(1.0),
            Vec2::new(1.0, 1.0),
            Mass::new(1.0),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);

        assert_eq!(
            joint.solve(&mut set),
            Ok(SolveStatus::Skipped(SkipReason::DegenerateDistance))
        );
        assert_eq!(position(&set, a), Vec2::new(1.0, 1.0));
        assert!(set.get(b).unwrap().is_valid());
    }

    #[test]
    fn test_stale_collider_is_an_error() {
        let (mut set, a, b) = pair(
            Vec2::new(0.0, 0.0),
            Mass::new(1.0),
            Vec2::new(10.0, 0.0),
            Mass::new(1.0),
        );
        let mut joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);
        set.remove(b);

        assert_eq!(joint.solve(&mut set), Err(SolverError::MissingCollider(b)));
        assert_eq!(position(&set, a), Vec2::new(0.0, 0.0));
        assert!(joint.violation(&set).is_none());
    }

    #[test]
    fn test_stiffness_is_clamped() {
        let (set, a, b) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(1.0, 0.0), Mass::new(1.0));
        let mut joint = DistanceJoint::new(&set, a, b, 1.0, 1.5);
        assert_eq!(joint.stiffness(), 1.0);

        joint.set_stiffness(-0.5).unwrap();
        assert_eq!(joint.stiffness(), 0.0);

        joint.set_stiffness(0.25).unwrap();
        assert_eq!(joint.stiffness(), 0.25);
    }

    #[test]
    fn test_rejects_non_finite_parameters() {
        let (set, a, b) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(1.0, 0.0), Mass::new(1.0));
        let mut joint = DistanceJoint::new(&set, a, b, 1.0, 0.5);

        assert!(matches!(
            joint.set_stiffness(f64::NAN),
            Err(SolverError::InvalidParameter { name: "stiffness", .. })
        ));
        assert_eq!(joint.stiffness(), 0.5);

        assert!(joint.set_resting_distance(-1.0).is_err());
        assert!(joint.set_resting_distance(f64::INFINITY).is_err());
        assert_eq!(joint.resting_distance(), 1.0);

        joint.set_resting_distance(3.0).unwrap();
        assert_eq!(joint.resting_distance(), 3.0);
    }

    #[test]
    #[should_panic(expected = "Invalid distance joint")]
    fn test_new_panics_on_self_joint() {
        let (set, a, _) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(1.0, 0.0), Mass::new(1.0));
        DistanceJoint::new(&set, a, a, 1.0, 1.0);
    }

    #[test]
    fn test_from_current_uses_separation() {
        let (set, a, b) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(3.0, 4.0), Mass::new(1.0));
        let joint = DistanceJoint::from_current(&set, a, b, 0.5).unwrap();
        assert_eq!(joint.resting_distance(), 5.0);
        assert_eq!(joint.violation(&set), Some(0.0));
    }

    #[test]
    fn test_debug_render_draws_rest_marker() {
        let (set, a, b) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(10.0, 0.0), Mass::new(1.0));
        let joint = DistanceJoint::new(&set, a, b, 4.0, 1.0);

        let mut recorder = LineRecorder::new();
        joint.debug_render(&set, &mut recorder);

        let lines = recorder.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].color, REST_LENGTH_COLOR);
        assert_eq!(lines[1].from.distance(lines[1].to), 4.0);
        assert_eq!(lines[1].from.lerp(lines[1].to, 0.5), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_display() {
        let (set, a, b) = pair(Vec2::ZERO, Mass::new(1.0), Vec2::new(1.0, 0.0), Mass::new(1.0));
        let joint = DistanceJoint::new(&set, a, b, 5.0, 1.0);
        assert_eq!(
            joint.to_string(),
            "DistanceJoint(Collider(0, gen: 0) -> Collider(1, gen: 0), rest: 5, stiffness: 1)"
        );
    }
}
