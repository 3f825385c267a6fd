//! The scope stack and the guards that drive it.
//!
//! Entering a scope validates it, saves the engine state into a new frame and applies the
//! scope's attributes in order. Leaving it runs the closing action (on normal exit only) and
//! restores the frame. [`Scope`] guarantees the leave step on every exit path: normal return,
//! an error returned from the body, or a panic unwinding through it.

use crate::attr::Attribute;
use crate::canvas::CanvasOptions;
use crate::closing;
use crate::engine::{Engine, GraphicsState};
use crate::error::{Error, Result};
use crate::geom::Point;
use crate::grammar::{self, ActionKind};
use crate::paper::Paper;
use crate::tracker::PathTracker;
use crate::transform;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Groups nested scopes; paints nothing itself.
    With,
    /// Builds a path and strokes it on exit.
    Draw,
    /// Builds a path and fills it on exit.
    Paint,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ScopeKind::With => "with",
            ScopeKind::Draw => "draw",
            ScopeKind::Paint => "paint",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeHandle {
    id: u64,
    depth: usize,
}

impl ScopeHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// One open scope. The engine-side snapshot lives on the engine's save stack, one entry per
/// frame.
#[derive(Debug, Clone)]
struct Frame {
    handle: ScopeHandle,
    kind: ScopeKind,
    entry_point: Option<Point>,
}

#[derive(Debug, Default)]
struct ScopeStack {
    frames: Vec<Frame>,
    next_id: u64,
}

impl ScopeStack {
    fn depth(&self) -> usize {
        self.frames.len()
    }

    fn top_kind(&self) -> Option<ScopeKind> {
        self.frames.last().map(|f| f.kind)
    }

    fn push(&mut self, kind: ScopeKind, entry_point: Option<Point>) -> ScopeHandle {
        let handle = ScopeHandle {
            id: self.next_id,
            depth: self.frames.len(),
        };
        self.next_id += 1;
        self.frames.push(Frame {
            handle,
            kind,
            entry_point,
        });
        handle
    }

    fn pop(&mut self, handle: ScopeHandle) -> Result<Frame> {
        match self.frames.pop() {
            Some(frame) if frame.handle == handle => Ok(frame),
            other => {
                let innermost = other.as_ref().map(|f| f.handle.id);
                if let Some(frame) = other {
                    self.frames.push(frame);
                }
                Err(Error::ScopeOrdering {
                    found: handle.id,
                    innermost,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitMode {
    Normal,
    Unwind,
}

/// Per-drawing state: the engine bound to the surface, the open scopes and the current point.
pub struct DrawingContext {
    engine: Box<dyn Engine>,
    stack: ScopeStack,
    tracker: PathTracker,
}

impl DrawingContext {
    /// Prepares a fresh engine for `paper`: paints the background and installs the unit-axis
    /// transform and the default ink and pen.
    pub fn new(mut engine: Box<dyn Engine>, paper: &Paper, options: &CanvasOptions) -> Result<Self> {
        paper.validate()?;
        if let Some(background) = paper.background_ink() {
            engine.paint_background(background.resolve()?);
        }

        let (width, height) = paper.surface_size();
        engine.transform(&transform::initial_transform(
            width,
            height,
            paper.border_fraction(),
            paper.is_centered(),
        ));
        engine.set_source(options.default_ink);
        let mut stroke = engine.state().stroke;
        stroke.width =
            options.default_pen_width * transform::length_scale(&engine.state().transform);
        engine.set_stroke(stroke);

        Ok(Self {
            engine,
            stack: ScopeStack::default(),
            tracker: PathTracker::new(),
        })
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn state(&self) -> &GraphicsState {
        self.engine.state()
    }

    /// Opens a scope. Prefer the closure API on [`crate::Canvas`] and [`Scope`], which pairs
    /// every `enter` with an `exit`.
    pub fn enter(&mut self, kind: ScopeKind, attributes: &[Attribute]) -> Result<ScopeHandle> {
        let depth = self.stack.depth();
        grammar::validate(self.stack.top_kind(), kind, attributes, depth)?;

        self.engine.save();
        let handle = self.stack.push(kind, self.tracker.current_point());
        for attr in attributes {
            if let Err(err) = attr.apply(self.engine.as_mut()) {
                self.unwind(handle);
                return Err(err);
            }
        }

        tracing::debug!(
            scope = handle.id,
            %kind,
            depth,
            attributes = attributes.len(),
            "enter scope"
        );
        Ok(handle)
    }

    /// Closes the innermost scope: runs its closing action, then restores its frame.
    ///
    /// `handle` must be the innermost open scope, otherwise this is
    /// [`Error::ScopeOrdering`] and nothing is restored.
    pub fn exit(&mut self, handle: ScopeHandle) -> Result<()> {
        self.leave(handle, ExitMode::Normal)
    }

    fn unwind(&mut self, handle: ScopeHandle) {
        if let Err(err) = self.leave(handle, ExitMode::Unwind) {
            tracing::warn!(scope = handle.id, %err, "failed to restore scope while unwinding");
        }
    }

    fn leave(&mut self, handle: ScopeHandle, mode: ExitMode) -> Result<()> {
        let frame = self.stack.pop(handle)?;
        let segments = self.tracker.take_segments();
        let closed = match mode {
            ExitMode::Normal => closing::close(frame.kind, &segments, self.engine.as_mut()),
            ExitMode::Unwind => Ok(()),
        };
        let restored = self.engine.restore();

        tracing::debug!(
            scope = handle.id,
            kind = %frame.kind,
            depth = handle.depth,
            ?mode,
            entry_point = ?frame.entry_point,
            "exit scope"
        );
        closed?;
        restored?;
        Ok(())
    }

    /// Writes the surface once every scope has been left.
    pub fn finish(mut self, output: Option<&Path>) -> Result<()> {
        if let Some(frame) = self.stack.frames.last() {
            return Err(Error::ScopeOrdering {
                found: frame.handle.id,
                innermost: Some(frame.handle.id),
            });
        }
        if let Some(path) = output {
            self.engine.write_to_file(path)?;
            tracing::info!(path = %path.display(), "wrote drawing");
        }
        Ok(())
    }

    fn to_device(&self, x: f64, y: f64) -> Point {
        transform::to_device(&self.engine.state().transform, x, y)
    }
}

/// Runs `body` inside a new `kind` scope and leaves the scope on every exit path.
pub(crate) fn run_scope<T>(
    ctx: &mut DrawingContext,
    kind: ScopeKind,
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    let handle = ctx.enter(kind, attributes)?;
    let mut scope = Scope {
        ctx,
        handle,
        kind,
        open: true,
    };
    let outcome = body(&mut scope);
    scope.close(outcome)
}

/// An open scope, handed to the body of `with`/`draw`/`paint` calls.
pub struct Scope<'a> {
    ctx: &'a mut DrawingContext,
    handle: ScopeHandle,
    kind: ScopeKind,
    open: bool,
}

impl Scope<'_> {
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn depth(&self) -> usize {
        self.handle.depth
    }

    pub fn state(&self) -> &GraphicsState {
        self.ctx.state()
    }

    /// Nested `with` scope. Only legal inside another `with` scope.
    pub fn with<T>(
        &mut self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        run_scope(self.ctx, ScopeKind::With, attributes, body)
    }

    /// Nested `draw` scope: strokes its path on exit. Only legal inside a `with` scope.
    pub fn draw<T>(
        &mut self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        run_scope(self.ctx, ScopeKind::Draw, attributes, body)
    }

    /// Nested `paint` scope: fills its path on exit. Only legal inside a `with` scope.
    pub fn paint<T>(
        &mut self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        run_scope(self.ctx, ScopeKind::Paint, attributes, body)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        grammar::check_action(self.kind, ActionKind::Move)?;
        let p = self.ctx.to_device(x, y);
        tracing::trace!(x, y, "move");
        self.ctx.tracker.move_to(p);
        Ok(())
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        grammar::check_action(self.kind, ActionKind::Line)?;
        let p = self.ctx.to_device(x, y);
        tracing::trace!(x, y, "line");
        self.ctx.tracker.line_to(p);
        Ok(())
    }

    /// The current point in the user space of this scope.
    ///
    /// Survives strokes and fills: a path started in a later scope continues from here.
    ///
    /// `None` when there is no current point, and also when the current transform is singular
    /// (e.g. `scale(0.0)`) so user space has no inverse; [`Scope::device_point`] still has it.
    pub fn current_point(&self) -> Option<Point> {
        let p = self.ctx.tracker.current_point()?;
        transform::to_user(&self.ctx.state().transform, p)
    }

    /// The current point in device space, independent of the current transform.
    pub fn device_point(&self) -> Option<Point> {
        self.ctx.tracker.current_point()
    }

    /// Direct access to the engine. Calls made through it skip every grammar check; points
    /// are device-space and any state change is still undone when this scope exits.
    pub fn raw(&mut self) -> &mut dyn Engine {
        self.ctx.engine.as_mut()
    }

    fn close<T>(mut self, outcome: Result<T>) -> Result<T> {
        self.open = false;
        match outcome {
            Ok(value) => {
                self.ctx.exit(self.handle)?;
                Ok(value)
            }
            Err(err) => {
                self.ctx.unwind(self.handle);
                Err(err)
            }
        }
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if self.open {
            self.ctx.unwind(self.handle);
        }
    }
}
