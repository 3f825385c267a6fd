use super::{RenderError, Result};
use scopedraw_core::geom::{Point, Transform};
use scopedraw_core::{
    Color, Engine, EngineError, GraphicsState, LineCap, LineJoin, OutputFormat, StateStack,
    StrokeStyle,
};
use std::fmt::Write as _;
use std::path::Path;

/// Engine that accumulates SVG markup. Device units are SVG user units; PDF output converts
/// the finished document with svg2pdf.
#[derive(Debug, Clone)]
pub struct SvgEngine {
    width: f64,
    height: f64,
    state: StateStack,
    body: String,
    path_data: String,
}

impl SvgEngine {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: StateStack::new(),
            body: String::new(),
            path_data: String::new(),
        }
    }

    /// The complete document as it stands.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 160);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width=""#);
        fmt_number(&mut out, self.width);
        out.push_str(r#"" height=""#);
        fmt_number(&mut out, self.height);
        out.push_str(r#"" viewBox="0 0 "#);
        fmt_number(&mut out, self.width);
        out.push(' ');
        fmt_number(&mut out, self.height);
        out.push_str("\">");
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        svg_to_pdf(&self.to_svg())
    }

    fn push_paint(&mut self, attr: &str, color: Color) {
        let _ = write!(
            self.body,
            r#" {attr}="rgb({},{},{})""#,
            color.r, color.g, color.b
        );
        if !color.is_opaque() {
            let _ = write!(self.body, r#" {attr}-opacity=""#);
            fmt_number(&mut self.body, f64::from(color.alpha_f32()));
            self.body.push('"');
        }
    }

    fn push_point(&mut self, cmd: char, point: Point) {
        if !self.path_data.is_empty() {
            self.path_data.push(' ');
        }
        self.path_data.push(cmd);
        fmt_number(&mut self.path_data, point.x);
        self.path_data.push(',');
        fmt_number(&mut self.path_data, point.y);
    }
}

impl Engine for SvgEngine {
    fn state(&self) -> &GraphicsState {
        self.state.current()
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) -> std::result::Result<(), EngineError> {
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
        if color.a == 0 {
            return;
        }
        self.body.push_str(r#"<rect x="0" y="0" width="100%" height="100%""#);
        self.push_paint("fill", color);
        self.body.push_str("/>");
    }

    fn move_to(&mut self, point: Point) {
        self.push_point('M', point);
    }

    fn line_to(&mut self, point: Point) {
        let cmd = if self.path_data.is_empty() { 'M' } else { 'L' };
        self.push_point(cmd, point);
    }

    fn stroke(&mut self) -> std::result::Result<(), EngineError> {
        if self.path_data.is_empty() {
            return Ok(());
        }
        let d = std::mem::take(&mut self.path_data);
        let GraphicsState { source, stroke, .. } = *self.state.current();

        let _ = write!(self.body, r#"<path d="{d}" fill="none""#);
        self.push_paint("stroke", source);
        self.body.push_str(r#" stroke-width=""#);
        fmt_number(&mut self.body, stroke.width);
        let _ = write!(
            self.body,
            r#"" stroke-linecap="{}" stroke-linejoin="{}"/>"#,
            linecap_name(stroke.cap),
            linejoin_name(stroke.join)
        );
        Ok(())
    }

    fn fill(&mut self) -> std::result::Result<(), EngineError> {
        if self.path_data.is_empty() {
            return Ok(());
        }
        let d = std::mem::take(&mut self.path_data);
        let source = self.state.current().source;

        let _ = write!(self.body, r#"<path d="{d}""#);
        self.push_paint("fill", source);
        self.body.push_str("/>");
        Ok(())
    }

    fn write_to_file(&mut self, path: &Path) -> std::result::Result<(), EngineError> {
        let bytes = match OutputFormat::from_path(path)? {
            OutputFormat::Svg => self.to_svg().into_bytes(),
            OutputFormat::Pdf => self.to_pdf()?,
            other => return Err(EngineError::UnsupportedFormat(format!("{other:?}"))),
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn linecap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn linejoin_name(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

#[cfg(feature = "pdf")]
fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let opt = svg2pdf::usvg::Options::default();
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| RenderError::SvgParse)?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RenderError::PdfConvert)
}

#[cfg(not(feature = "pdf"))]
fn svg_to_pdf(_svg: &str) -> Result<Vec<u8>> {
    Err(RenderError::FormatDisabled {
        format: OutputFormat::Pdf,
    })
}

/// Writes `v` rounded to three fractional digits, trailing zeros and `-0` dropped.
fn fmt_number(out: &mut String, v: f64) {
    let k = if v.is_finite() {
        (v * 1000.0).round() as i64
    } else {
        0
    };
    if k < 0 {
        out.push('-');
    }
    let abs = k.unsigned_abs();
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac != 0 {
        let digits = format!("{frac:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}
