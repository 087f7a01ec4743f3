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
//! Debug visualization boundary
//!
//! The solver does not render anything itself. Constraints describe
//! themselves as coloured line segments through [`DebugDraw`], and the host
//! application forwards those to whatever renderer it uses.

use crate::math::Vec2;

/// RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Opaque red
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    /// Opaque green
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    /// Opaque yellow
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

    /// Create a colour from all four components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Create an opaque colour
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::rgba(r, g, b, 1.0)
    }
}

/// Sink for debug geometry
///
/// Only `debug_render` paths call into this trait; solving never does.
pub trait DebugDraw {
    /// Draw a line segment between two world-space points
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
}

/// A recorded line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point
    pub from: Vec2,
    /// End point
    pub to: Vec2,
    /// Colour
    pub color: Color,
}

/// [`DebugDraw`] implementation that stores every segment it receives
///
/// Useful for headless diagnostics and for asserting what a constraint draws.
///
/// # Examples
///
/// ```
/// use joint_solver::debug::{Color, DebugDraw, LineRecorder};
/// use joint_solver::math::Vec2;
///
/// let mut recorder = LineRecorder::new();
/// recorder.draw_line(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE);
/// assert_eq!(recorder.lines().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineRecorder {
    lines: Vec<Line>,
}

impl LineRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        LineRecorder { lines: Vec::new() }
    }

    /// Segments recorded so far, in draw order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Forget all recorded segments
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl DebugDraw for LineRecorder {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.lines.push(Line { from, to, color });
    }
}
