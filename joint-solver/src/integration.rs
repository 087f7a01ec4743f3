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
//! Position prediction before constraint solving
//!
//! Position-based dynamics keeps no explicit velocity. Each collider's
//! velocity is implied by the gap between its current and previous position,
//! so anything the constraint solver does to a position automatically feeds
//! into the next step's motion.
//!
//! # Algorithm
//!
//! ```text
//! x(t + dt) = x(t) + (x(t) - x(t - dt)) * damping + a * dt²
//! ```
//!
//! # Timestep Guidelines
//!
//! - Recommended: start with dt = 1/60 (60 FPS)
//! - Large steps let colliders travel far between solves, which stretches
//!   joints more than a few passes can recover from
//!
//! # References
//!
//! - Jakobsen, T. (2001). Advanced Character Physics. Game Developers Conference.
//! - Müller, M., Heidelberger, B., Hennix, M., & Ratcliff, J. (2007).
//!   Position Based Dynamics. Journal of Visual Communication and Image
//!   Representation, 18(2), 109-118.

use crate::collider::{Collider, ColliderSet};
use crate::math::{clamp, Vec2};
use tracing::warn;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Trait for integration methods that advance colliders before solving
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    fn set_timestep(&mut self, dt: f64);

    /// Validate the timestep for stability
    ///
    /// Returns a warning message if the timestep might cause numerical issues.
    fn validate_timestep(&self) -> Result<(), String> {
        let dt = self.timestep();

        if dt <= 0.0 || !dt.is_finite() {
            return Err(format!("Invalid timestep: {}. Must be positive and finite.", dt));
        }

        // dt² underflows the correction for very small steps
        if dt < 1e-6 {
            return Err(format!(
                "Warning: Timestep {} is extremely small; \
                 dt² loses precision in position prediction.",
                dt
            ));
        }

        if dt > 0.1 {
            return Err(format!(
                "Warning: Timestep {} is large; \
                 joints may stretch further than the solver can recover.",
                dt
            ));
        }

        Ok(())
    }

    /// Advance every movable collider by one timestep
    ///
    /// Returns the number of colliders updated.
    fn integrate(&mut self, colliders: &mut ColliderSet) -> usize;
}

/// Position-Verlet integrator under a uniform acceleration
///
/// # Example
///
/// ```
/// use joint_solver::integration::{Integrator, VerletIntegrator};
/// use joint_solver::math::Vec2;
///
/// let integrator = VerletIntegrator::new(1.0 / 60.0).with_gravity(Vec2::new(0.0, -9.81));
/// assert_eq!(integrator.timestep(), 1.0 / 60.0);
/// ```
#[derive(Debug, Clone)]
pub struct VerletIntegrator {
    timestep: f64,
    gravity: Vec2,
    damping: f64,
}

impl VerletIntegrator {
    /// Create an integrator with no gravity and no damping
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    pub fn new(timestep: f64) -> Self {
        assert!(
            timestep > 0.0 && timestep.is_finite(),
            "Timestep must be positive and finite"
        );
        VerletIntegrator {
            timestep,
            gravity: Vec2::ZERO,
            damping: 1.0,
        }
    }

    /// Set the uniform acceleration applied to every movable collider
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the velocity retention factor, clamped into `[0, 1]`
    ///
    /// 1.0 keeps all velocity, 0.0 stops colliders every step.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = if damping.is_nan() { 1.0 } else { clamp(damping, 0.0, 1.0) };
        self
    }

    /// Uniform acceleration
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Velocity retention factor
    pub fn damping(&self) -> f64 {
        self.damping
    }

    fn advance(&self, collider: &mut Collider) -> bool {
        if collider.is_immovable() {
            return false;
        }

        let dt = self.timestep;
        let current = collider.position();
        let velocity = (current - collider.previous_position()) * self.damping;
        let next = current + velocity + self.gravity * (dt * dt);

        if !next.is_finite() {
            warn!(
                position = %current,
                "position prediction produced a non-finite value, leaving collider in place"
            );
            return false;
        }

        collider.set_previous_position(current);
        collider.set_position(next);
        true
    }
}

impl Integrator for VerletIntegrator {
    fn name(&self) -> &str {
        "Position Verlet"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "Timestep must be positive and finite"
        );
        self.timestep = dt;
    }

    fn integrate(&mut self, colliders: &mut ColliderSet) -> usize {
        self.advance_all(colliders)
    }
}

impl VerletIntegrator {
    /// Collider count from which prediction is spread across the rayon pool
    pub const PARALLEL_THRESHOLD: usize = 1024;

    fn advance_all(&self, colliders: &mut ColliderSet) -> usize {
        // Each collider is advanced independently, so parallel iteration is race-free
        #[cfg(feature = "parallel")]
        if colliders.len() >= Self::PARALLEL_THRESHOLD {
            return colliders
                .par_colliders_mut()
                .map(|collider| self.advance(collider) as usize)
                .sum();
        }

        self.advance_sequential(colliders)
    }

    fn advance_sequential(&self, colliders: &mut ColliderSet) -> usize {
        colliders
            .colliders_mut()
            .map(|collider| self.advance(collider) as usize)
            .sum()
    }
}
