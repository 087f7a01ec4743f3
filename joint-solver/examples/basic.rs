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
//! Basic example demonstrating a single distance joint
//!
//! Two colliders start too far apart; repeated solves pull them to the
//! resting distance. A heavier collider moves less than a lighter one.

use joint_solver::collider::{Collider, ColliderSet, Mass};
use joint_solver::constraint::{Constraint, DistanceJoint, SolveStatus};
use joint_solver::debug::LineRecorder;
use joint_solver::math::Vec2;
use joint_solver::{SolverError, SolverResult};

fn main() -> SolverResult<()> {
    println!("Joint Solver - Basic Distance Joint Example");
    println!("===========================================\n");

    let mut colliders = ColliderSet::new();
    let heavy = colliders.insert(Collider::new(Vec2::new(0.0, 0.0), Mass::new(3.0)));
    let light = colliders.insert(Collider::new(Vec2::new(10.0, 0.0), Mass::new(1.0)));
    println!("Created colliders {} and {}", heavy, light);

    let mut joint = DistanceJoint::try_new(&colliders, heavy, light, 4.0, 0.5)?;
    println!("Joint: {}\n", joint);

    for iteration in 1..=8 {
        let status = joint.solve(&mut colliders)?;
        let a = colliders.try_get(heavy)?.position();
        let b = colliders.try_get(light)?.position();
        println!(
            "  iteration {}: {:?}, heavy at {}, light at {}, distance {:.6}",
            iteration,
            status,
            a,
            b,
            a.distance(b)
        );
    }

    // Colliders dropped on top of each other are skipped rather than exploding
    let stacked = colliders.insert(Collider::new(Vec2::new(10.0, 0.0), Mass::new(1.0)));
    colliders
        .get_mut(light)
        .ok_or(SolverError::MissingCollider(light))?
        .set_position(Vec2::new(10.0, 0.0));
    let mut degenerate = DistanceJoint::try_new(&colliders, light, stacked, 1.0, 1.0)?;
    if let SolveStatus::Skipped(reason) = degenerate.solve(&mut colliders)? {
        println!("\nCoincident colliders skipped: {}", reason);
    }

    let mut recorder = LineRecorder::new();
    joint.debug_render(&colliders, &mut recorder);
    println!("\nDebug render produced {} lines:", recorder.lines().len());
    for line in recorder.lines() {
        println!("  {} -> {}", line.from, line.to);
    }

    println!("\nExample completed successfully!");
    Ok(())
}
