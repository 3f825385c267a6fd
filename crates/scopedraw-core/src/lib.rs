#![forbid(unsafe_code)]

//! Scoped, composable attributes for imperative 2D vector drawing.
//!
//! A drawing is a tree of scopes. `with` scopes group other scopes; `draw` and `paint` scopes
//! build a path from `move`/`line` actions and stroke or fill it when they exit. Attributes
//! given on entry (ink, pen, scale, translate, rotate) affect that scope and everything nested
//! in it, and are undone when it exits, on every exit path.
//!
//! The outermost scope also carries the `Paper` (surface size and unit axes) and optionally the
//! `File` to write once the drawing is complete.
//!
//! This crate is engine-agnostic: rendering goes through the [`Engine`] and [`Backend`] traits.
//! [`RecordingBackend`] keeps a display list; the `scopedraw` crate provides raster and vector
//! backends.

pub mod attr;
pub mod canvas;
pub mod closing;
pub mod color;
pub mod engine;
pub mod error;
pub mod geom;
pub mod grammar;
pub mod paper;
pub mod recorder;
pub mod scope;
pub mod tracker;
pub mod transform;

pub use attr::{Attribute, Category, File, Ink, OutputFormat, Pen};
pub use canvas::{Canvas, CanvasOptions, draw_scope, paint_scope, with_scope};
pub use closing::ClosingAction;
pub use color::Color;
pub use engine::{
    Backend, Engine, GraphicsState, LineCap, LineJoin, StateStack, StrokeStyle, SurfaceSpec,
};
pub use error::{EngineError, Error, GrammarViolation, Result};
pub use paper::{Orientation, Paper, PaperSize, Sheet};
pub use recorder::{Op, Recorder, Recording, RecordingBackend};
pub use scope::{DrawingContext, Scope, ScopeHandle, ScopeKind};
