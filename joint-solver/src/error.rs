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
//! Error types for the solver
//!
//! Fallible operations return [`SolverResult<T>`].

use crate::collider::ColliderHandle;
use crate::solver::ConstraintId;
use thiserror::Error;

/// Unified error type for joint construction, parameter updates and solving
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A handle does not resolve to a live collider
    #[error("{0} is not present in the collider set")]
    MissingCollider(ColliderHandle),

    /// A joint was asked to bind a collider to itself
    #[error("joint cannot bind {0} to itself")]
    SelfJoint(ColliderHandle),

    /// A constraint parameter is outside its accepted domain
    #[error("invalid value for `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Solver configuration is invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No constraint is registered under this id
    #[error("{0} is not registered")]
    UnknownConstraint(ConstraintId),
}

/// Convenience alias for `Result<T, SolverError>`
pub type SolverResult<T> = Result<T, SolverError>;
