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
//! Solver configuration

use crate::error::{SolverError, SolverResult};

/// Configuration for the constraint solver
///
/// # Builder Pattern
///
/// ```
/// use joint_solver::solver::SolverConfig;
///
/// let config = SolverConfig::new()
///     .with_iterations(8)
///     .with_tolerance(1e-6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Number of passes over all constraints per solve. More passes converge
    /// further but cost proportionally more. Default: 4.
    pub iterations: usize,
    /// Stop early once every measurable constraint violation is at or below
    /// this value. `None` always runs every pass. Default: `None`.
    pub tolerance: Option<f64>,
}

impl SolverConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        SolverConfig {
            iterations: 4,
            tolerance: None,
        }
    }

    /// Set the number of passes
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enable early exit at the given violation tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] if `iterations` is zero or the
    /// tolerance is negative, NaN or infinite.
    pub fn validate(&self) -> SolverResult<()> {
        if self.iterations == 0 {
            return Err(SolverError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }

        if let Some(tolerance) = self.tolerance {
            if !(tolerance >= 0.0 && tolerance.is_finite()) {
                return Err(SolverError::InvalidConfig(format!(
                    "tolerance must be non-negative and finite, got {}",
                    tolerance
                )));
            }
        }

        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
