use super::{RenderError, RenderOptions, Result};
use scopedraw_core::geom::{Point, Transform};
use scopedraw_core::{
    Color, Engine, EngineError, GraphicsState, LineCap, LineJoin, OutputFormat, StateStack,
    StrokeStyle,
};
use std::path::Path;

/// tiny-skia pixmap engine. Device units are pixels.
pub struct RasterEngine {
    pixmap: tiny_skia::Pixmap,
    state: StateStack,
    path: tiny_skia::PathBuilder,
    anti_alias: bool,
    jpeg_quality: u8,
}

impl RasterEngine {
    pub fn new(width: f64, height: f64, options: &RenderOptions) -> Result<Self> {
        let width_px = width.ceil().max(1.0) as u32;
        let height_px = height.ceil().max(1.0) as u32;
        let pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RenderError::PixmapAlloc {
            width: width_px,
            height: height_px,
        })?;
        Ok(Self {
            pixmap,
            state: StateStack::new(),
            path: tiny_skia::PathBuilder::new(),
            anti_alias: options.anti_alias,
            jpeg_quality: options.jpeg_quality,
        })
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    fn take_path(&mut self) -> Option<tiny_skia::Path> {
        std::mem::replace(&mut self.path, tiny_skia::PathBuilder::new()).finish()
    }

    fn paint(&self) -> tiny_skia::Paint<'static> {
        let Color { r, g, b, a } = self.state.current().source;
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.anti_alias;
        paint
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(|_| RenderError::PngEncode)
    }

    /// Encodes the pixmap as JPG, compositing it over white first.
    pub fn encode_jpeg(&self) -> Result<Vec<u8>> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());

        // tiny-skia stores premultiplied RGBA8, so "over white" is `c + (255 - a)` per channel.
        let rgba = self.pixmap.data();
        let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
        for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
            let cover = 255 - src[3];
            dst[0] = src[0].saturating_add(cover);
            dst[1] = src[1].saturating_add(cover);
            dst[2] = src[2].saturating_add(cover);
        }

        let mut out = Vec::new();
        let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
            .map_err(|_| RenderError::JpegEncode)?;
        Ok(out)
    }
}

fn skia_stroke(style: &StrokeStyle) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: style.width as f32,
        line_cap: match style.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: match style.join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        },
        ..Default::default()
    }
}

impl Engine for RasterEngine {
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
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point.x as f32, point.y as f32);
    }

    fn line_to(&mut self, point: Point) {
        self.path.line_to(point.x as f32, point.y as f32);
    }

    fn stroke(&mut self) -> std::result::Result<(), EngineError> {
        let Some(path) = self.take_path() else {
            return Ok(());
        };
        let stroke = skia_stroke(&self.state.current().stroke);
        let paint = self.paint();
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn fill(&mut self) -> std::result::Result<(), EngineError> {
        let Some(path) = self.take_path() else {
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn write_to_file(&mut self, path: &Path) -> std::result::Result<(), EngineError> {
        let bytes = match OutputFormat::from_path(path)? {
            OutputFormat::Jpeg => self.encode_jpeg()?,
            OutputFormat::Png => self.encode_png()?,
            other => return Err(EngineError::UnsupportedFormat(format!("{other:?}"))),
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
