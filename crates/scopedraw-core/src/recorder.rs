//! An engine that keeps a display list instead of pixels.
//!
//! Useful for inspecting exactly what a drawing paints (colors, stroke widths, device-space
//! geometry) and for dumping that as JSON.

use crate::color::Color;
use crate::engine::{Backend, Engine, GraphicsState, StateStack, StrokeStyle, SurfaceSpec};
use crate::error::EngineError;
use crate::geom::{Point, Transform};
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub type Subpath = Vec<[f64; 2]>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Background {
        color: Color,
    },
    Stroke {
        subpaths: Vec<Subpath>,
        color: Color,
        stroke: StrokeStyle,
    },
    Fill {
        subpaths: Vec<Subpath>,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recording {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<Op>,
}

impl Recording {
    pub fn strokes(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(|op| matches!(op, Op::Stroke { .. }))
    }

    pub fn fills(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(|op| matches!(op, Op::Fill { .. }))
    }
}

pub struct Recorder {
    state: StateStack,
    pending: Vec<Subpath>,
    recording: Rc<RefCell<Recording>>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: StateStack::new(),
            pending: Vec::new(),
            recording: Rc::new(RefCell::new(Recording {
                width,
                height,
                ops: Vec::new(),
            })),
        }
    }

    pub fn recording(&self) -> Recording {
        self.recording.borrow().clone()
    }

    fn take_subpaths(&mut self) -> Vec<Subpath> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|sp| sp.len() > 1)
            .collect()
    }
}

impl Engine for Recorder {
    fn state(&self) -> &GraphicsState {
        self.state.current()
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) -> Result<(), EngineError> {
        self.state.restore()
    }

    fn set_source(&mut self, color: Color) {
        self.state.current_mut().source = color;
    }

    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.state.current_mut().stroke = stroke;
    }

    fn transform(&mut self, incremental: &Transform) {
        self.state.concat(incremental);
    }

    fn paint_background(&mut self, color: Color) {
        self.recording
            .borrow_mut()
            .ops
            .push(Op::Background { color });
    }

    fn move_to(&mut self, point: Point) {
        self.pending.push(vec![[point.x, point.y]]);
    }

    fn line_to(&mut self, point: Point) {
        match self.pending.last_mut() {
            Some(subpath) => subpath.push([point.x, point.y]),
            None => self.move_to(point),
        }
    }

    fn stroke(&mut self) -> Result<(), EngineError> {
        let subpaths = self.take_subpaths();
        if !subpaths.is_empty() {
            let state = self.state.current();
            let op = Op::Stroke {
                subpaths,
                color: state.source,
                stroke: state.stroke,
            };
            self.recording.borrow_mut().ops.push(op);
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<(), EngineError> {
        let subpaths = self.take_subpaths();
        if !subpaths.is_empty() {
            let color = self.state.current().source;
            self.recording
                .borrow_mut()
                .ops
                .push(Op::Fill { subpaths, color });
        }
        Ok(())
    }

    /// Writes the display list as pretty-printed JSON, whatever the extension.
    fn write_to_file(&mut self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_vec_pretty(&*self.recording.borrow())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Backend handing out [`Recorder`]s.
///
/// Every surface gets its own display list; the backend only remembers which one was created
/// last, so drawings running at the same time never see each other's ops.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    last: RefCell<Rc<RefCell<Recording>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording of the most recently created surface.
    pub fn recording(&self) -> Recording {
        self.last.borrow().borrow().clone()
    }
}

impl Backend for RecordingBackend {
    fn create_surface(&self, spec: &SurfaceSpec) -> Result<Box<dyn Engine>, EngineError> {
        let recorder = Recorder::new(spec.width, spec.height);
        *self.last.borrow_mut() = Rc::clone(&recorder.recording);
        Ok(Box::new(recorder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    #[test]
    fn stroke_captures_state_and_clears_pending_path() {
        let mut rec = Recorder::new(10.0, 10.0);
        rec.set_source(Color::rgb(0, 0, 255));
        rec.move_to(point(0.0, 0.0));
        rec.line_to(point(1.0, 0.0));
        rec.stroke().unwrap();
        rec.stroke().unwrap();

        let recording = rec.recording();
        assert_eq!(recording.ops.len(), 1);
        let Op::Stroke {
            subpaths, color, ..
        } = &recording.ops[0]
        else {
            panic!("expected a stroke, got {:?}", recording.ops[0]);
        };
        assert_eq!(subpaths, &vec![vec![[0.0, 0.0], [1.0, 0.0]]]);
        assert_eq!(*color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn lone_move_is_not_painted() {
        let mut rec = Recorder::new(10.0, 10.0);
        rec.move_to(point(3.0, 3.0));
        rec.fill().unwrap();
        assert!(rec.recording().ops.is_empty());
    }

    #[test]
    fn writes_display_list_as_json() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let out = tmp.path().join("drawing.json");

        let mut rec = Recorder::new(4.0, 2.0);
        rec.paint_background(Color::WHITE);
        rec.write_to_file(&out).unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(json["width"], 4.0);
        assert_eq!(json["ops"][0]["op"], "background");
        assert_eq!(json["ops"][0]["color"]["r"], 255);
    }
}
