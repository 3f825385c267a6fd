#![forbid(unsafe_code)]

//! `scopedraw` draws 2D vector pictures from nested, attribute-carrying scopes and writes them
//! as PNG, JPG, SVG or PDF.
//!
//! ```no_run
//! use scopedraw::attr::{file, ink, paper, pen};
//!
//! scopedraw::with(&[paper(400.0, 400.0), file("square.png")], |s| {
//!     s.draw(&[ink("navy"), pen(0.02)], |d| {
//!         d.move_to(0.1, 0.1)?;
//!         d.line_to(0.9, 0.1)?;
//!         d.line_to(0.9, 0.9)?;
//!         d.line_to(0.1, 0.9)?;
//!         d.line_to(0.1, 0.1)
//!     })
//! })?;
//! # Ok::<(), scopedraw::Error>(())
//! ```
//!
//! # Features
//!
//! - `raster`: PNG/JPG output through tiny-skia (default)
//! - `pdf`: PDF output through svg2pdf (default)

pub use scopedraw_core::*;

pub mod render;

use render::Renderer;

/// Outermost `with` scope rendered by a default [`Renderer`].
pub fn with<T>(
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(&Renderer::default()).with(attributes, body)
}

/// Outermost `draw` scope rendered by a default [`Renderer`].
pub fn draw<T>(
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(&Renderer::default()).draw(attributes, body)
}

/// Outermost `paint` scope rendered by a default [`Renderer`].
pub fn paint<T>(
    attributes: &[Attribute],
    body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
) -> Result<T> {
    Canvas::new(&Renderer::default()).paint(attributes, body)
}
