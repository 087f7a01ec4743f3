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
//! # Joint Solver
//!
//! A position-based constraint solver for 2D point-mass colliders.
//!
//! ## Features
//!
//! - **Position-Based Constraints**: Joints correct positions directly, weighted by inverse mass
//! - **Gauss-Seidel Relaxation**: Constraints solve in a stable order, each seeing earlier
//!   corrections
//! - **Safe Collider References**: Joints hold generational handles, so removed colliders
//!   surface as errors
//! - **Guarded Numerics**: Coincident colliders, immovable pairs and overflowing corrections
//!   are skipped, never turned into NaN
//! - **Parallelization**: Optional Rayon integration for position prediction
//!
//! ## Example
//!
//! ```rust
//! use joint_solver::collider::{Collider, ColliderSet, Mass};
//! use joint_solver::constraint::{Constraint, DistanceJoint};
//! use joint_solver::math::Vec2;
//!
//! let mut colliders = ColliderSet::new();
//! let a = colliders.insert(Collider::new(Vec2::new(0.0, 0.0), Mass::new(1.0)));
//! let b = colliders.insert(Collider::new(Vec2::new(10.0, 0.0), Mass::new(1.0)));
//!
//! let mut joint = DistanceJoint::new(&colliders, a, b, 5.0, 1.0);
//! joint.solve(&mut colliders).unwrap();
//! assert_eq!(joint.current_distance(&colliders).unwrap(), 5.0);
//! ```

#![warn(missing_docs)]

/// Colliders and the collider arena
pub mod collider;

/// Constraint capability and joint types
pub mod constraint;

/// Debug visualization boundary
pub mod debug;

/// Error types
pub mod error;

/// Position prediction
pub mod integration;

/// Vector math
pub mod math;

/// Constraint registry and solver loop
pub mod solver;

/// Simulation world
pub mod world;

pub use error::{SolverError, SolverResult};
pub use world::PhysicsWorld;
