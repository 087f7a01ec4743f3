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
//! Point-mass colliders
//!
//! A collider is the part of a body the constraint solver sees: a world-space
//! position it may rewrite and a mass it reads to weight corrections.

use crate::math::Vec2;

/// Mass with double-precision value
///
/// Zero or near-zero mass marks an immovable body. Its inverse mass is 0, so
/// constraints push all of their correction onto the other collider instead
/// of dividing by zero.
///
/// # Examples
///
/// ```
/// use joint_solver::collider::Mass;
///
/// let mass = Mass::new(2.0);
/// assert_eq!(mass.inverse(), 0.5);
/// assert!(!mass.is_immovable());
///
/// let anchor = Mass::immovable();
/// assert_eq!(anchor.inverse(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Threshold below which mass is considered effectively zero (immovable)
    pub const IMMOVABLE_THRESHOLD: f64 = 1e-10;

    /// Create a new mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is negative, NaN or infinite. For fallible
    /// construction, use `try_new`.
    pub fn new(value: f64) -> Self {
        assert!(value >= 0.0 && value.is_finite(), "Mass must be non-negative and finite");
        Mass { value }
    }

    /// Try to create a new mass
    ///
    /// Returns `None` if the value is negative, NaN or infinite.
    pub fn try_new(value: f64) -> Option<Self> {
        if value >= 0.0 && value.is_finite() {
            Some(Mass { value })
        } else {
            None
        }
    }

    /// Create an immovable mass (treated as infinite mass)
    pub fn immovable() -> Self {
        Mass { value: 0.0 }
    }

    /// Get the mass value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Check if this is an immovable body (zero or near-zero mass)
    pub fn is_immovable(&self) -> bool {
        self.value < Self::IMMOVABLE_THRESHOLD
    }

    /// Get the inverse mass (1/m)
    ///
    /// Returns 0.0 for immovable bodies.
    pub fn inverse(&self) -> f64 {
        if self.is_immovable() {
            0.0
        } else {
            1.0 / self.value
        }
    }
}

impl Default for Mass {
    fn default() -> Self {
        Mass::new(1.0)
    }
}

/// A point-mass collider
///
/// `previous_position` is the position at the start of the last integration
/// step. Position-Verlet integration derives velocity from it, so teleporting
/// a collider with [`Collider::set_position`] leaves its velocity alone while
/// [`Collider::reset_position`] also brings it to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    position: Vec2,
    previous_position: Vec2,
    mass: Mass,
}

impl Collider {
    /// Create a collider at rest
    pub fn new(position: Vec2, mass: Mass) -> Self {
        Collider {
            position,
            previous_position: position,
            mass,
        }
    }

    /// Create an immovable collider at the given position
    pub fn fixed(position: Vec2) -> Self {
        Collider::new(position, Mass::immovable())
    }

    /// Current world-space position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Overwrite the current position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the collider and clear its implicit velocity
    pub fn reset_position(&mut self, position: Vec2) {
        self.position = position;
        self.previous_position = position;
    }

    /// Position at the start of the last integration step
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    pub(crate) fn set_previous_position(&mut self, position: Vec2) {
        self.previous_position = position;
    }

    /// Mass of the collider
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Replace the mass of the collider
    pub fn set_mass(&mut self, mass: Mass) {
        self.mass = mass;
    }

    /// Shorthand for `self.mass().inverse()`
    pub fn inverse_mass(&self) -> f64 {
        self.mass.inverse()
    }

    /// Check if the collider cannot be moved by constraints
    pub fn is_immovable(&self) -> bool {
        self.mass.is_immovable()
    }

    /// Check if position and previous position are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.previous_position.is_finite()
    }
}
