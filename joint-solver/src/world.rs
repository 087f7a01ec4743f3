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
//! World management
//!
//! The world owns colliders and constraints and runs the simulation step:
//! predict positions with the integrator, then relax constraints.

use crate::collider::{Collider, ColliderHandle, ColliderSet};
use crate::constraint::Constraint;
use crate::debug::DebugDraw;
use crate::error::SolverResult;
use crate::integration::Integrator;
use crate::solver::{ConstraintId, ConstraintSet, ConstraintSolver, SolveReport, SolverConfig};
use tracing::{debug, warn};

/// The main simulation container
///
/// # Examples
///
/// ```
/// use joint_solver::collider::{Collider, Mass};
/// use joint_solver::constraint::DistanceJoint;
/// use joint_solver::integration::VerletIntegrator;
/// use joint_solver::math::Vec2;
/// use joint_solver::solver::SolverConfig;
/// use joint_solver::PhysicsWorld;
///
/// let integrator = VerletIntegrator::new(1.0 / 60.0).with_gravity(Vec2::new(0.0, -9.81));
/// let mut world = PhysicsWorld::new(integrator, SolverConfig::default()).unwrap();
///
/// let anchor = world.add_collider(Collider::fixed(Vec2::new(0.0, 0.0)));
/// let bob = world.add_collider(Collider::new(Vec2::new(1.0, 0.0), Mass::new(1.0)));
/// let joint = DistanceJoint::from_current(world.colliders(), anchor, bob, 1.0).unwrap();
/// world.add_constraint(joint);
///
/// world.step();
/// let length = world.colliders().get(bob).unwrap().position().length();
/// assert!((length - 1.0).abs() < 1e-9);
/// ```
pub struct PhysicsWorld {
    colliders: ColliderSet,
    constraints: ConstraintSet,
    solver: ConstraintSolver,
    integrator: Box<dyn Integrator>,
    step_count: u64,
}

impl PhysicsWorld {
    /// Create an empty world
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`](crate::SolverError::InvalidConfig)
    /// if `config` is invalid.
    pub fn new<I: Integrator + 'static>(integrator: I, config: SolverConfig) -> SolverResult<Self> {
        if let Err(message) = integrator.validate_timestep() {
            warn!(integrator = integrator.name(), %message, "questionable timestep");
        }

        Ok(PhysicsWorld {
            colliders: ColliderSet::new(),
            constraints: ConstraintSet::new(),
            solver: ConstraintSolver::new(config)?,
            integrator: Box::new(integrator),
            step_count: 0,
        })
    }

    /// Add a collider
    pub fn add_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.colliders.insert(collider)
    }

    /// Remove a collider together with every constraint bound to it
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let collider = self.colliders.remove(handle)?;
        let dropped = self.constraints.remove_involving(handle);
        if dropped > 0 {
            debug!(collider = %handle, dropped, "removed constraints bound to removed collider");
        }
        Some(collider)
    }

    /// Register a constraint at the end of the solve order
    pub fn add_constraint<C: Constraint + 'static>(&mut self, constraint: C) -> ConstraintId {
        self.constraints.insert(Box::new(constraint))
    }

    /// Unregister a constraint
    pub fn remove_constraint(&mut self, id: ConstraintId) -> SolverResult<Box<dyn Constraint>> {
        self.constraints.remove(id)
    }

    /// Read access to the colliders
    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    /// Mutable access to the colliders
    ///
    /// Removing a collider through this reference leaves constraints bound
    /// to it registered; they fail to solve until removed. Prefer
    /// [`remove_collider`](Self::remove_collider).
    pub fn colliders_mut(&mut self) -> &mut ColliderSet {
        &mut self.colliders
    }

    /// Read access to the constraints
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Mutable access to the constraints
    pub fn constraints_mut(&mut self) -> &mut ConstraintSet {
        &mut self.constraints
    }

    /// The active integrator
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// The constraint solver
    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    /// Replace the solver configuration
    pub fn set_solver_config(&mut self, config: SolverConfig) -> SolverResult<()> {
        self.solver.set_config(config)
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Advance the simulation by one timestep
    pub fn step(&mut self) -> SolveReport {
        self.integrator.integrate(&mut self.colliders);
        let report = self.solve_constraints();
        self.step_count += 1;

        if report.failed > 0 {
            warn!(step = self.step_count, failed = report.failed, "constraints failed during step");
        }
        report
    }

    /// Run the solver without integrating
    pub fn solve_constraints(&mut self) -> SolveReport {
        self.solver.solve(&mut self.colliders, &mut self.constraints)
    }

    /// Emit debug geometry for every constraint, in solve order
    pub fn debug_render(&self, draw: &mut dyn DebugDraw) {
        for (_, constraint) in self.constraints.iter() {
            constraint.debug_render(&self.colliders, draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Mass;
    use crate::constraint::DistanceJoint;
    use crate::debug::LineRecorder;
    use crate::integration::VerletIntegrator;
    use crate::math::Vec2;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(VerletIntegrator::new(1.0 / 60.0), SolverConfig::default()).unwrap()
    }

    #[test]
    fn test_world_creation() {
        let world = world();
        assert!(world.colliders().is_empty());
        assert!(world.constraints().is_empty());
        assert_eq!(world.step_count(), 0);
        assert_eq!(world.integrator().name(), "Position Verlet");
    }

    #[test]
    fn test_invalid_config_fails_creation() {
        let result = PhysicsWorld::new(
            VerletIntegrator::new(1.0 / 60.0),
            SolverConfig::new().with_iterations(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_collider_drops_constraints() {
        let mut world = world();
        let a = world.add_collider(Collider::new(Vec2::ZERO, Mass::new(1.0)));
        let b = world.add_collider(Collider::new(Vec2::new(1.0, 0.0), Mass::new(1.0)));
        let c = world.add_collider(Collider::new(Vec2::new(2.0, 0.0), Mass::new(1.0)));

        let ab = DistanceJoint::new(world.colliders(), a, b, 1.0, 1.0);
        let bc = DistanceJoint::new(world.colliders(), b, c, 1.0, 1.0);
        world.add_constraint(ab);
        world.add_constraint(bc);

        assert!(world.remove_collider(a).is_some());
        assert_eq!(world.constraints().len(), 1);
        assert!(world.remove_collider(a).is_none());

        let report = world.step();
        assert_eq!(report.failed, 0);
        assert_eq!(world.step_count(), 1);
    }

    #[test]
    fn test_debug_render_visits_all_constraints() {
        let mut world = world();
        let a = world.add_collider(Collider::new(Vec2::ZERO, Mass::new(1.0)));
        let b = world.add_collider(Collider::new(Vec2::new(1.0, 0.0), Mass::new(1.0)));
        let c = world.add_collider(Collider::new(Vec2::new(2.0, 0.0), Mass::new(1.0)));
        let ab = DistanceJoint::new(world.colliders(), a, b, 1.0, 1.0);
        let bc = DistanceJoint::new(world.colliders(), b, c, 1.0, 1.0);
        world.add_constraint(ab);
        world.add_constraint(bc);

        let mut recorder = LineRecorder::new();
        world.debug_render(&mut recorder);
        // Joint line plus rest-length marker per distance joint
        assert_eq!(recorder.lines().len(), 4);
    }

    #[test]
    fn test_remove_constraint() {
        let mut world = world();
        let a = world.add_collider(Collider::new(Vec2::ZERO, Mass::new(1.0)));
        let b = world.add_collider(Collider::new(Vec2::new(1.0, 0.0), Mass::new(1.0)));
        let joint = DistanceJoint::new(world.colliders(), a, b, 1.0, 1.0);
        let id = world.add_constraint(joint);

        assert!(world.remove_constraint(id).is_ok());
        assert!(world.remove_constraint(id).is_err());
    }
}
