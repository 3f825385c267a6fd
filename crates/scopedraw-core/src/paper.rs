use crate::attr::Ink;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MM_PER_INCH: f64 = 25.4;

pub const DEFAULT_DPI: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    B4,
    B5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Portrait dimensions in inches.
    pub fn inches(self) -> (f64, f64) {
        let mm = |w: f64, h: f64| (w / MM_PER_INCH, h / MM_PER_INCH);
        match self {
            Self::A0 => mm(841.0, 1189.0),
            Self::A1 => mm(594.0, 841.0),
            Self::A2 => mm(420.0, 594.0),
            Self::A3 => mm(297.0, 420.0),
            Self::A4 => mm(210.0, 297.0),
            Self::A5 => mm(148.0, 210.0),
            Self::A6 => mm(105.0, 148.0),
            Self::B4 => mm(250.0, 353.0),
            Self::B5 => mm(176.0, 250.0),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
        }
    }

    /// Starts a [`Sheet`] builder for this size.
    pub fn sheet(self) -> Sheet {
        Sheet::new(self)
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let size = match s.trim().to_ascii_lowercase().as_str() {
            "a0" => Self::A0,
            "a1" => Self::A1,
            "a2" => Self::A2,
            "a3" => Self::A3,
            "a4" => Self::A4,
            "a5" => Self::A5,
            "a6" => Self::A6,
            "b4" => Self::B4,
            "b5" => Self::B5,
            "letter" => Self::Letter,
            "legal" => Self::Legal,
            "tabloid" => Self::Tabloid,
            _ => {
                return Err(Error::InvalidPaper {
                    message: format!("unknown paper size {s:?}"),
                });
            }
        };
        Ok(size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(Error::InvalidPaper {
                message: format!("unknown orientation {s:?}"),
            }),
        }
    }
}

/// A standard paper size at a resolution and orientation.
///
/// `dpi` and `orientation` only exist here: explicit `Paper::new` surfaces are already in
/// device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sheet {
    size: PaperSize,
    dpi: f64,
    orientation: Orientation,
}

impl Sheet {
    /// `size` at [`DEFAULT_DPI`] in portrait orientation.
    pub fn new(size: PaperSize) -> Self {
        Self {
            size,
            dpi: DEFAULT_DPI,
            orientation: Orientation::Portrait,
        }
    }

    /// Resolution used to turn the paper size into device units.
    pub fn dpi(mut self, value: f64) -> Self {
        self.dpi = value;
        self
    }

    pub fn orientation(mut self, value: Orientation) -> Self {
        self.orientation = value;
        self
    }

    pub fn size(&self) -> PaperSize {
        self.size
    }

    /// Device units.
    pub fn surface_size(&self) -> (f64, f64) {
        let (w, h) = self.size.inches();
        let (w, h) = (w * self.dpi, h * self.dpi);
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

impl From<PaperSize> for Sheet {
    fn from(size: PaperSize) -> Self {
        Sheet::new(size)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Dimensions {
    Explicit { width: f64, height: f64 },
    Standard(Sheet),
}

/// Bootstrap attribute: establishes the drawing surface and the unit coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    dimensions: Dimensions,
    background: Option<Ink>,
    border: f64,
    centered: bool,
}

impl Paper {
    /// A surface of `width x height` device units (pixels for raster output, points for
    /// vector output).
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_dimensions(Dimensions::Explicit { width, height })
    }

    /// A standard paper size: either a bare [`PaperSize`] (72 dpi, portrait) or a [`Sheet`].
    pub fn standard(sheet: impl Into<Sheet>) -> Self {
        Self::with_dimensions(Dimensions::Standard(sheet.into()))
    }

    fn with_dimensions(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            background: None,
            border: 0.0,
            centered: false,
        }
    }

    pub fn background(mut self, ink: impl Into<Ink>) -> Self {
        self.background = Some(ink.into());
        self
    }

    /// Fraction of the shorter surface axis kept as margin on each side.
    pub fn border(mut self, fraction: f64) -> Self {
        self.border = fraction;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    pub fn background_ink(&self) -> Option<&Ink> {
        self.background.as_ref()
    }

    pub fn border_fraction(&self) -> f64 {
        self.border
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    /// Surface size in device units.
    pub fn surface_size(&self) -> (f64, f64) {
        match &self.dimensions {
            Dimensions::Explicit { width, height } => (*width, *height),
            Dimensions::Standard(sheet) => sheet.surface_size(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (w, h) = self.surface_size();
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(Error::InvalidPaper {
                message: format!("surface size must be positive, got {w} x {h}"),
            });
        }
        if !(self.border.is_finite() && (0.0..0.5).contains(&self.border)) {
            return Err(Error::InvalidPaper {
                message: format!("border must be in [0, 0.5), got {}", self.border),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_sizes_scale_with_dpi_and_orientation() {
        let (w, h) = Paper::standard(PaperSize::Letter.sheet().dpi(100.0)).surface_size();
        assert_eq!((w, h), (850.0, 1100.0));

        let (w, h) = Paper::standard(Sheet::new(PaperSize::A4).orientation(Orientation::Landscape))
            .surface_size();
        assert!((w - 841.889).abs() < 1e-3);
        assert!((h - 595.275).abs() < 1e-3);
    }

    #[test]
    fn bare_paper_size_is_portrait_at_default_dpi() {
        let (w, h) = Paper::standard(PaperSize::A6).surface_size();
        assert!((w - 105.0 / 25.4 * DEFAULT_DPI).abs() < 1e-9);
        assert!((h - 148.0 / 25.4 * DEFAULT_DPI).abs() < 1e-9);
        assert_eq!(Paper::new(640.0, 480.0).surface_size(), (640.0, 480.0));
    }

    #[test]
    fn paper_size_names_are_case_insensitive() {
        assert_eq!("A4".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!(" letter ".parse::<PaperSize>().unwrap(), PaperSize::Letter);
        assert!("a10".parse::<PaperSize>().is_err());
        assert_eq!(
            "Landscape".parse::<Orientation>().unwrap(),
            Orientation::Landscape
        );
    }

    #[test]
    fn validation_rejects_degenerate_surfaces() {
        assert!(Paper::new(0.0, 10.0).validate().is_err());
        assert!(Paper::new(10.0, 10.0).border(0.5).validate().is_err());
        assert!(Paper::new(10.0, 10.0).border(0.1).validate().is_ok());
    }
}
