use crate::attr::Attribute;
use crate::color::Color;
use crate::engine::{Backend, SurfaceSpec};
use crate::error::Result;
use crate::grammar;
use crate::scope::{DrawingContext, Scope, ScopeKind, run_scope};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasOptions {
    /// Pen width before any `Pen` attribute, in unit-axis lengths.
    pub default_pen_width: f64,
    pub default_ink: Color,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            default_pen_width: 0.005,
            default_ink: Color::BLACK,
        }
    }
}

/// Entry point for outermost scopes.
///
/// Each call creates a fresh surface through the backend, runs the body, restores every frame
/// and writes the `File` output (if any) last. Nothing is written when the body fails.
#[derive(Clone, Copy)]
pub struct Canvas<'b> {
    backend: &'b dyn Backend,
    options: CanvasOptions,
}

impl<'b> Canvas<'b> {
    pub fn new(backend: &'b dyn Backend) -> Self {
        Self {
            backend,
            options: CanvasOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CanvasOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    pub fn with<T>(
        &self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        self.run(ScopeKind::With, attributes, body)
    }

    pub fn draw<T>(
        &self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        self.run(ScopeKind::Draw, attributes, body)
    }

    pub fn paint<T>(
        &self,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        self.run(ScopeKind::Paint, attributes, body)
    }

    fn run<T>(
        &self,
        kind: ScopeKind,
        attributes: &[Attribute],
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        let paper = grammar::bootstrap(attributes)?;
        paper.validate()?;
        let output = attributes.iter().rev().find_map(|attr| match attr {
            Attribute::File(file) => Some(file.path()),
            _ => None,
        });

        let (width, height) = paper.surface_size();
        let engine = self.backend.create_surface(&SurfaceSpec {
            width,
            height,
            output: output.map(|p| p.to_path_buf()),
        })?;
        let mut ctx = DrawingContext::new(engine, paper, &self.options)?;

        let value = run_scope(&mut ctx, kind, attributes, body)?;
        ctx.finish(output)?;
        Ok(value)
    }
}

pub fn with_scope<T>(
    backend: &dyn Backend,
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(backend).with(attributes, body)
}

pub fn draw_scope<T>(
    backend: &dyn Backend,
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(backend).draw(attributes, body)
}

pub fn paint_scope<T>(
    backend: &dyn Backend,
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(backend).paint(attributes, body)
}
