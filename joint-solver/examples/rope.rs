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
//! Rope example
//!
//! A chain of colliders hangs from a fixed anchor and swings under gravity.
//! Run with `RUST_LOG=joint_solver=debug` to see skipped solves and
//! constraint failures.

use joint_solver::collider::{Collider, ColliderHandle, Mass};
use joint_solver::constraint::DistanceJoint;
use joint_solver::integration::VerletIntegrator;
use joint_solver::math::Vec2;
use joint_solver::solver::SolverConfig;
use joint_solver::PhysicsWorld;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LINKS: usize = 12;
const LINK_LENGTH: f64 = 0.5;
const STEPS: u64 = 300;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let integrator = VerletIntegrator::new(1.0 / 60.0)
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_damping(0.995);
    let config = SolverConfig::new().with_iterations(16).with_tolerance(1e-6);
    let mut world = PhysicsWorld::new(integrator, config)?;

    // Rope starts horizontal so it swings down
    let mut handles: Vec<ColliderHandle> = vec![world.add_collider(Collider::fixed(Vec2::ZERO))];
    for i in 1..=LINKS {
        let position = Vec2::new(i as f64 * LINK_LENGTH, 0.0);
        handles.push(world.add_collider(Collider::new(position, Mass::new(1.0))));
    }
    for pair in handles.windows(2) {
        let joint = DistanceJoint::try_new(world.colliders(), pair[0], pair[1], LINK_LENGTH, 1.0)?;
        world.add_constraint(joint);
    }

    info!(
        colliders = world.colliders().len(),
        constraints = world.constraints().len(),
        "rope built"
    );

    let tip = handles[LINKS];
    for _ in 0..STEPS {
        let report = world.step();
        if world.step_count() % 60 == 0 {
            let position = world.colliders().try_get(tip)?.position();
            info!(
                step = world.step_count(),
                passes = report.passes,
                max_violation = report.max_violation.unwrap_or(0.0),
                tip = %position,
                "rope state"
            );
        }
    }

    // Cut the rope halfway; constraints bound to the removed collider go with it
    world.remove_collider(handles[LINKS / 2]);
    info!(constraints = world.constraints().len(), "rope cut");

    for _ in 0..60 {
        world.step();
    }
    let position = world.colliders().try_get(tip)?.position();
    info!(tip = %position, "free end after cut");

    Ok(())
}
