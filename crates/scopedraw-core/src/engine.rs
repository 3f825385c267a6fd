//! Adapter surface between the scope grammar and a concrete rendering engine.
//!
//! Engines keep a stack-based graphics state (transform, source color, stroke properties) and
//! paint device-space paths. Mapping user coordinates through the current transform happens in
//! the drawing context before a point reaches the engine.

use crate::color::Color;
use crate::error::EngineError;
use crate::geom::{Point, Transform};
use crate::transform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Device units.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsState {
    pub transform: Transform,
    pub source: Color,
    pub stroke: StrokeStyle,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            source: Color::BLACK,
            stroke: StrokeStyle::default(),
        }
    }
}

/// Save/restore bookkeeping shared by engine implementations.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) -> Result<(), EngineError> {
        self.current = self.saved.pop().ok_or(EngineError::StateUnderflow)?;
        Ok(())
    }

    pub fn concat(&mut self, incremental: &Transform) {
        self.current.transform = transform::compose(&self.current.transform, incremental);
    }
}

/// A rendering context bound to one surface.
///
/// Path operations take device-space points. Calls made through [`crate::Scope::raw`] bypass
/// the scope grammar entirely.
pub trait Engine {
    fn state(&self) -> &GraphicsState;

    fn save(&mut self);

    fn restore(&mut self) -> Result<(), EngineError>;

    fn set_source(&mut self, color: Color);

    fn set_stroke(&mut self, stroke: StrokeStyle);

    /// Pre-multiplies `incremental` onto the current transform.
    fn transform(&mut self, incremental: &Transform);

    /// Covers the whole surface with `color`, ignoring the current state.
    fn paint_background(&mut self, color: Color);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Strokes and clears the pending path.
    fn stroke(&mut self) -> Result<(), EngineError>;

    /// Fills (non-zero winding) and clears the pending path.
    fn fill(&mut self) -> Result<(), EngineError>;

    fn write_to_file(&mut self, path: &Path) -> Result<(), EngineError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    /// Device units.
    pub width: f64,
    pub height: f64,
    /// File the surface will be written to once the outermost scope exits.
    pub output: Option<PathBuf>,
}

/// Creates an engine bound to a fresh surface.
pub trait Backend {
    fn create_surface(&self, spec: &SurfaceSpec) -> Result<Box<dyn Engine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_stack_round_trips() {
        let mut stack = StateStack::new();
        let before = *stack.current();

        stack.save();
        stack.current_mut().source = Color::rgb(255, 0, 0);
        stack.concat(&transform::scale(2.0, 2.0));
        assert_ne!(*stack.current(), before);

        stack.restore().unwrap();
        assert_eq!(*stack.current(), before);
    }

    #[test]
    fn restore_without_save_underflows() {
        let mut stack = StateStack::new();
        assert!(matches!(stack.restore(), Err(EngineError::StateUnderflow)));
    }
}
