//! Attributes supplied on scope entry.
//!
//! Every attribute belongs to one [`Category`]. Bootstrap and Output attributes describe the
//! drawing as a whole and are only accepted on the outermost scope; State attributes mutate the
//! engine's graphics state and are undone when their scope's frame is restored.

use crate::color::Color;
use crate::engine::{Engine, LineCap, LineJoin};
use crate::error::{EngineError, Result};
use crate::paper::Paper;
use crate::transform;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bootstrap,
    Output,
    State,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::Bootstrap => "bootstrap",
            Category::Output => "output",
            Category::State => "state",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Paper(Paper),
    File(File),
    Ink(Ink),
    Pen(Pen),
    Scale { sx: f64, sy: f64 },
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
}

impl Attribute {
    pub fn category(&self) -> Category {
        match self {
            Attribute::Paper(_) => Category::Bootstrap,
            Attribute::File(_) => Category::Output,
            Attribute::Ink(_)
            | Attribute::Pen(_)
            | Attribute::Scale { .. }
            | Attribute::Translate { .. }
            | Attribute::Rotate { .. } => Category::State,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Paper(_) => "Paper",
            Attribute::File(_) => "File",
            Attribute::Ink(_) => "Ink",
            Attribute::Pen(_) => "Pen",
            Attribute::Scale { .. } => "Scale",
            Attribute::Translate { .. } => "Translate",
            Attribute::Rotate { .. } => "Rotate",
        }
    }

    /// Applies a State attribute to the engine's current graphics state.
    ///
    /// Bootstrap and Output attributes are consumed when the drawing context is created and
    /// finished, so they have no per-scope effect here.
    pub fn apply(&self, engine: &mut dyn Engine) -> Result<()> {
        match self {
            Attribute::Paper(_) | Attribute::File(_) => {}
            Attribute::Ink(ink) => {
                let color = ink.resolve()?;
                engine.set_source(color);
            }
            Attribute::Pen(pen) => {
                let mut stroke = engine.state().stroke;
                if let Some(width) = pen.width {
                    // Fixed in device units now; later Scale attributes do not rescale it.
                    stroke.width = width * transform::length_scale(&engine.state().transform);
                }
                if let Some(cap) = pen.cap {
                    stroke.cap = cap;
                }
                if let Some(join) = pen.join {
                    stroke.join = join;
                }
                engine.set_stroke(stroke);
            }
            Attribute::Scale { sx, sy } => engine.transform(&transform::scale(*sx, *sy)),
            Attribute::Translate { dx, dy } => engine.transform(&transform::translate(*dx, *dy)),
            Attribute::Rotate { radians } => engine.transform(&transform::rotate(*radians)),
        }
        Ok(())
    }
}

impl From<Paper> for Attribute {
    fn from(value: Paper) -> Self {
        Attribute::Paper(value)
    }
}

impl From<File> for Attribute {
    fn from(value: File) -> Self {
        Attribute::File(value)
    }
}

impl From<Ink> for Attribute {
    fn from(value: Ink) -> Self {
        Attribute::Ink(value)
    }
}

impl From<Pen> for Attribute {
    fn from(value: Pen) -> Self {
        Attribute::Pen(value)
    }
}

/// Source color for strokes and fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ink {
    /// CSS color text, parsed when the attribute is applied.
    Spec(String),
    Color(Color),
}

impl Ink {
    pub fn new(spec: impl Into<String>) -> Self {
        Ink::Spec(spec.into())
    }

    pub fn resolve(&self) -> Result<Color> {
        match self {
            Ink::Spec(spec) => Color::parse(spec),
            Ink::Color(color) => Ok(*color),
        }
    }
}

impl From<&str> for Ink {
    fn from(value: &str) -> Self {
        Ink::new(value)
    }
}

impl From<String> for Ink {
    fn from(value: String) -> Self {
        Ink::Spec(value)
    }
}

impl From<Color> for Ink {
    fn from(value: Color) -> Self {
        Ink::Color(value)
    }
}

/// Stroke properties. Unset fields keep whatever is currently in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pen {
    pub width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width in the user-space units in effect when the pen is applied.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = Some(join);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
}

impl OutputFormat {
    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, EngineError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            other => Err(EngineError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Output attribute: where the finished surface is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> std::result::Result<OutputFormat, EngineError> {
        OutputFormat::from_path(&self.path)
    }
}

pub fn paper(width: f64, height: f64) -> Attribute {
    Attribute::Paper(Paper::new(width, height))
}

pub fn file(path: impl Into<PathBuf>) -> Attribute {
    Attribute::File(File::new(path))
}

pub fn ink(ink: impl Into<Ink>) -> Attribute {
    Attribute::Ink(ink.into())
}

pub fn pen(width: f64) -> Attribute {
    Attribute::Pen(Pen::new().width(width))
}

pub fn scale(factor: f64) -> Attribute {
    scale_xy(factor, factor)
}

pub fn scale_xy(sx: f64, sy: f64) -> Attribute {
    Attribute::Scale { sx, sy }
}

pub fn translate(dx: f64, dy: f64) -> Attribute {
    Attribute::Translate { dx, dy }
}

pub fn rotate(radians: f64) -> Attribute {
    Attribute::Rotate { radians }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_attribute_kind() {
        assert_eq!(paper(1.0, 1.0).category(), Category::Bootstrap);
        assert_eq!(file("x.png").category(), Category::Output);
        for attr in [ink("red"), pen(0.1), scale(2.0), translate(1.0, 0.0), rotate(0.5)] {
            assert_eq!(attr.category(), Category::State, "{}", attr.name());
        }
    }

    #[test]
    fn output_format_is_inferred_from_extension() {
        assert_eq!(File::new("a/b.PNG").format().unwrap(), OutputFormat::Png);
        assert_eq!(File::new("b.jpeg").format().unwrap(), OutputFormat::Jpeg);
        assert_eq!(File::new("b.jpg").format().unwrap(), OutputFormat::Jpeg);
        assert_eq!(File::new("b.svg").format().unwrap(), OutputFormat::Svg);
        assert_eq!(File::new("b.pdf").format().unwrap(), OutputFormat::Pdf);
        assert!(matches!(
            File::new("b.bmp").format(),
            Err(EngineError::UnsupportedFormat(ext)) if ext == "bmp"
        ));
        assert!(File::new("noext").format().is_err());
    }
}
