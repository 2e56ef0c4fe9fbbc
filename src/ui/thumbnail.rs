//! Small rasterized previews of tile sources, drawn with half-block cells
//! (two pixels per cell, one per half).

use std::collections::HashMap;
use std::path::Path;

use ratatui::layout::Rect;
use ratatui::style::Style;
use resvg::{tiny_skia, usvg};

use super::UiFrame;
use crate::probe::ProbeError;
use crate::theme::rgb_to_color;

const MAX_PREVIEW_DIM: u32 = 128;
const UPPER_HALF: &str = "\u{2580}";

/// Opaque RGB pixels, alpha already composited over black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgb: Vec<(u8, u8, u8)>,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Build from straight-alpha RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        let rgb = rgba
            .chunks_exact(4)
            .map(|px| {
                let a = px[3] as u16;
                let mul = |c: u8| (c as u16 * a / 255) as u8;
                (mul(px[0]), mul(px[1]), mul(px[2]))
            })
            .collect();
        Some(Self { width, height, rgb })
    }

    pub fn load(src: &str) -> Result<Self, ProbeError> {
        let path = Path::new(src);
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            return Self::load_svg(&std::fs::read(path)?);
        }
        let image = image::open(path)?
            .thumbnail(MAX_PREVIEW_DIM, MAX_PREVIEW_DIM)
            .to_rgba8();
        let (w, h) = image.dimensions();
        Self::from_rgba(w, h, image.as_raw()).ok_or(ProbeError::EmptyImage)
    }

    fn load_svg(bytes: &[u8]) -> Result<Self, ProbeError> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|err| ProbeError::Svg(err.to_string()))?;
        let size = tree.size().to_int_size();
        let max_dim = size.width().max(size.height()).max(1);
        let scale = (MAX_PREVIEW_DIM as f32 / max_dim as f32).min(1.0);
        let w = ((size.width() as f32 * scale).round() as u32).max(1);
        let h = ((size.height() as f32 * scale).round() as u32).max(1);
        let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or(ProbeError::EmptyImage)?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        // tiny-skia stores premultiplied pixels, which is already "over black".
        let rgb = pixmap
            .data()
            .chunks_exact(4)
            .map(|px| (px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width: w,
            height: h,
            rgb,
        })
    }

    fn sample(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.rgb
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or((0, 0, 0))
    }
}

/// Previews keyed by source locator. Failed loads are remembered so a broken
/// source is not re-read every frame.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<String, Option<Raster>>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, src: &str) -> Option<&Raster> {
        self.entries
            .entry(src.to_string())
            .or_insert_with(|| match Raster::load(src) {
                Ok(raster) => Some(raster),
                Err(err) => {
                    tracing::debug!(src, error = %err, "no preview for source");
                    None
                }
            })
            .as_ref()
    }
}

/// Stretch `raster` over `area`.
pub fn render_raster(frame: &mut UiFrame<'_>, raster: &Raster, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let rows = area.height as u32 * 2;
    for row in 0..area.height {
        for col in 0..area.width {
            let sx = col as u32 * raster.width / area.width as u32;
            let sy_top = (row as u32 * 2) * raster.height / rows;
            let sy_bottom = (row as u32 * 2 + 1) * raster.height / rows;
            let style = Style::default()
                .fg(rgb_to_color(raster.sample(sx, sy_top)))
                .bg(rgb_to_color(raster.sample(sx, sy_bottom)));
            frame.set_symbol(area.x + col, area.y + row, UPPER_HALF, style);
        }
    }
}
