//! Natural pixel dimensions of a source image.
//!
//! Only the dimensions are read; raster formats are probed from their header
//! and SVG documents from their declared size.

use std::io;
use std::path::Path;

use resvg::usvg;
use thiserror::Error;

use crate::constants::{FALLBACK_NATURAL_H, FALLBACK_NATURAL_W};
use crate::error::EngineError;
use crate::geometry::Size;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("svg parse failed: {0}")]
    Svg(String),
    #[error("image has no pixels")]
    EmptyImage,
}

/// Resolves a source locator to its natural size. Implementations run on
/// drop-resolution worker threads.
pub trait NaturalSizeProbe: Send + Sync {
    fn probe(&self, src: &str) -> Result<Size, ProbeError>;
}

/// Filesystem probe: `src` is a path to an SVG or raster image.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProbe;

impl NaturalSizeProbe for ImageProbe {
    fn probe(&self, src: &str) -> Result<Size, ProbeError> {
        let path = Path::new(src);
        if is_svg(path) {
            let bytes = std::fs::read(path)?;
            return svg_size(&bytes);
        }
        let (w, h) = image::image_dimensions(path)?;
        if w == 0 || h == 0 {
            return Err(ProbeError::EmptyImage);
        }
        Ok(Size::new(w as f64, h as f64))
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"))
}

/// Declared size of an SVG document.
pub fn svg_size(bytes: &[u8]) -> Result<Size, ProbeError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|err| ProbeError::Svg(err.to_string()))?;
    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(ProbeError::EmptyImage);
    }
    Ok(Size::new(size.width().round() as f64, size.height().round() as f64))
}

/// Natural size with the failure folded into a fallback.
///
/// Zero dimensions become one pixel so the aspect ratio stays finite.
pub fn resolve_natural_size(
    probe: &dyn NaturalSizeProbe,
    src: &str,
) -> (Size, Option<EngineError>) {
    match probe.probe(src) {
        Ok(size) => (Size::new(size.w.max(1.0), size.h.max(1.0)), None),
        Err(err) => {
            tracing::warn!(src, error = %err, "natural size probe failed, using fallback");
            (
                Size::new(FALLBACK_NATURAL_W, FALLBACK_NATURAL_H),
                Some(EngineError::ImageResolutionFailed {
                    src: src.to_string(),
                    reason: err.to_string(),
                }),
            )
        }
    }
}
