//! Concrete engines and the backend that picks between them.

#[cfg(feature = "raster")]
pub mod raster;
pub mod vector;

use scopedraw_core::{Backend, Engine, EngineError, OutputFormat, SurfaceSpec};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to parse generated SVG")]
    SvgParse,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
    #[error("{format:?} output is not available in this build")]
    FormatDisabled { format: OutputFormat },
}

impl From<RenderError> for EngineError {
    fn from(value: RenderError) -> Self {
        EngineError::backend(value)
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub anti_alias: bool,
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            anti_alias: true,
            jpeg_quality: 90,
        }
    }
}

/// Backend choosing the engine from the output file's extension: a tiny-skia pixmap for
/// PNG/JPG (and for drawings without a file), an SVG document for SVG/PDF.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub options: RenderOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

impl Backend for Renderer {
    fn create_surface(&self, spec: &SurfaceSpec) -> std::result::Result<Box<dyn Engine>, EngineError> {
        let format = spec
            .output
            .as_deref()
            .map(OutputFormat::from_path)
            .transpose()?;
        tracing::debug!(
            width = spec.width,
            height = spec.height,
            ?format,
            "creating surface"
        );

        match format {
            Some(OutputFormat::Pdf) if !cfg!(feature = "pdf") => Err(RenderError::FormatDisabled {
                format: OutputFormat::Pdf,
            }
            .into()),
            Some(OutputFormat::Svg) | Some(OutputFormat::Pdf) => {
                Ok(Box::new(vector::SvgEngine::new(spec.width, spec.height)))
            }
            Some(format @ (OutputFormat::Png | OutputFormat::Jpeg)) => {
                raster_engine(spec.width, spec.height, format, &self.options)
            }
            None if cfg!(feature = "raster") => {
                raster_engine(spec.width, spec.height, OutputFormat::Png, &self.options)
            }
            None => Ok(Box::new(vector::SvgEngine::new(spec.width, spec.height))),
        }
    }
}

#[cfg(feature = "raster")]
fn raster_engine(
    width: f64,
    height: f64,
    _format: OutputFormat,
    options: &RenderOptions,
) -> std::result::Result<Box<dyn Engine>, EngineError> {
    Ok(Box::new(raster::RasterEngine::new(width, height, options)?))
}

#[cfg(not(feature = "raster"))]
fn raster_engine(
    _width: f64,
    _height: f64,
    format: OutputFormat,
    _options: &RenderOptions,
) -> std::result::Result<Box<dyn Engine>, EngineError> {
    Err(RenderError::FormatDisabled { format }.into())
}
