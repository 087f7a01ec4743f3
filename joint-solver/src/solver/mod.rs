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
//! Iterative constraint solving
//!
//! The solver runs Gauss-Seidel relaxation: within a pass, constraints are
//! solved one after another in registry order and each one sees the positions
//! already corrected by the constraints before it. Several passes propagate
//! corrections along chains of joints.
//!
//! Solving is strictly sequential. Colliders are shared between constraints
//! and every solve is a read-then-write on their positions, so running two
//! constraints on the same colliders concurrently would lose updates.
//!
//! # Failure Policy
//!
//! A single bad constraint never aborts the pass:
//! - Degenerate geometry is skipped by the constraint itself and counted
//! - A constraint that returns an error (stale collider handle) is logged,
//!   counted, and the pass moves on to the next constraint

mod config;
mod registry;

pub use config::SolverConfig;
pub use registry::{ConstraintId, ConstraintSet};

use crate::collider::ColliderSet;
use crate::constraint::SolveStatus;
use crate::error::SolverResult;
use tracing::{trace, warn};

/// Statistics from one [`ConstraintSolver::solve`] call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveReport {
    /// Number of passes actually run
    pub passes: usize,
    /// Constraint solves that wrote a correction, summed over passes
    pub applied: usize,
    /// Constraint solves skipped by the constraint for any
    /// [`SkipReason`](crate::constraint::SkipReason), summed over passes
    pub skipped: usize,
    /// Constraint solves that returned an error, summed over passes
    pub failed: usize,
    /// Largest measurable violation after the last pass
    pub max_violation: Option<f64>,
    /// Whether the tolerance was reached before the pass budget ran out
    pub converged: bool,
}

/// Drives every registered constraint through a fixed number of passes
///
/// # Examples
///
/// ```
/// use joint_solver::collider::{Collider, ColliderSet, Mass};
/// use joint_solver::constraint::DistanceJoint;
/// use joint_solver::math::Vec2;
/// use joint_solver::solver::{ConstraintSet, ConstraintSolver, SolverConfig};
///
/// let mut colliders = ColliderSet::new();
/// let a = colliders.insert(Collider::new(Vec2::new(0.0, 0.0), Mass::new(1.0)));
/// let b = colliders.insert(Collider::new(Vec2::new(4.0, 0.0), Mass::new(1.0)));
///
/// let mut constraints = ConstraintSet::new();
/// constraints.insert(Box::new(DistanceJoint::new(&colliders, a, b, 2.0, 1.0)));
///
/// let solver = ConstraintSolver::new(SolverConfig::new().with_iterations(1)).unwrap();
/// let report = solver.solve(&mut colliders, &mut constraints);
/// assert_eq!(report.applied, 1);
/// assert_eq!(report.max_violation, Some(0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintSolver {
    config: SolverConfig,
}

impl ConstraintSolver {
    /// Create a solver
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`](crate::SolverError::InvalidConfig)
    /// if the configuration fails [`SolverConfig::validate`].
    pub fn new(config: SolverConfig) -> SolverResult<Self> {
        config.validate()?;
        Ok(ConstraintSolver { config })
    }

    /// Active configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replace the configuration, keeping the old one if the new one is invalid
    pub fn set_config(&mut self, config: SolverConfig) -> SolverResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Run all passes over `constraints`
    ///
    /// Without a tolerance the violation is measured once, after the last
    /// pass. With one it is measured after every pass to allow the early exit.
    pub fn solve(
        &self,
        colliders: &mut ColliderSet,
        constraints: &mut ConstraintSet,
    ) -> SolveReport {
        let mut report = SolveReport::default();

        for pass in 0..self.config.iterations {
            report.passes = pass + 1;
            self.solve_pass(colliders, constraints, &mut report);

            if let Some(tolerance) = self.config.tolerance {
                report.max_violation = max_violation(colliders, constraints);
                if let Some(violation) = report.max_violation.filter(|v| *v <= tolerance) {
                    report.converged = true;
                    trace!(passes = report.passes, violation, "constraint solve converged");
                    break;
                }
            }
        }

        if self.config.tolerance.is_none() {
            report.max_violation = max_violation(colliders, constraints);
        }
        report
    }

    fn solve_pass(
        &self,
        colliders: &mut ColliderSet,
        constraints: &mut ConstraintSet,
        report: &mut SolveReport,
    ) {
        for (id, constraint) in constraints.iter_mut() {
            match constraint.solve(colliders) {
                Ok(SolveStatus::Applied) => report.applied += 1,
                Ok(SolveStatus::Skipped(reason)) => {
                    trace!(constraint = %id, %reason, "constraint skipped");
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!(
                        constraint = %id,
                        name = constraint.name(),
                        error = %err,
                        "constraint failed to solve"
                    );
                    report.failed += 1;
                }
            }
        }
    }
}

/// Largest violation reported by any constraint, or `None` if none can measure it
pub fn max_violation(colliders: &ColliderSet, constraints: &ConstraintSet) -> Option<f64> {
    constraints
        .iter()
        .filter_map(|(_, c)| c.violation(colliders))
        .fold(None, |max, v| Some(max.map_or(v, |m: f64| m.max(v))))
}
