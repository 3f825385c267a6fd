use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Parses a CSS color: named colors, hex notations, `rgb()` and `rgba()`.
    pub fn parse(spec: &str) -> Result<Self> {
        let s = spec.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        let lowered = s.to_ascii_lowercase();
        let c = svgtypes::Color::from_str(&lowered).map_err(|_| Error::InvalidColor {
            spec: spec.to_string(),
        })?;
        Ok(Self::rgba(c.red, c.green, c.blue, c.alpha))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(Color::parse("red").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse(" Blue ").unwrap(), Color::rgb(0, 0, 255));
        assert_eq!(Color::parse("#0f0").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::parse("#112233").unwrap(), Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn parses_functional_rgb() {
        assert_eq!(Color::parse("rgb(10, 20, 30)").unwrap(), Color::rgb(10, 20, 30));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = Color::parse("not-a-color").unwrap_err();
        assert!(matches!(err, Error::InvalidColor { spec } if spec == "not-a-color"));
    }
}
