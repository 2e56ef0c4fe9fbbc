//! Canvas-local geometry: points, sizes, canvas rectangles and the clamps
//! that keep a tile inside its canvas.
//!
//! All values are pixels in `f64`. Tile positions are *centers*, so a box is
//! described by `(center, size)` and its edges are `center ± size / 2`.
//!
//! Every clamp treats an empty canvas rectangle (zero or negative area, or
//! not yet measured) as "no information" and returns its input unchanged.
//! Callers that can observe a missing rectangle should skip the update
//! entirely instead of relying on that identity.

use crate::constants::{MIN_H, MIN_W};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// `w / h`, guarded against degenerate division.
    pub fn aspect(&self) -> f64 {
        sanitize_aspect(self.w / self.h)
    }
}

/// Pixel rectangle of a canvas. `x`/`y` is the origin in client coordinates,
/// tiles live in `[0, width] x [0, height]` local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the client origin.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// True when the rectangle has no usable area. NaN sizes count as empty.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a client-space pointer position into canvas-local pixels.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.x, client.y - self.y)
    }

    pub fn contains(&self, client: Point) -> bool {
        let local = self.to_local(client);
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.width && local.y < self.height
    }
}

/// Left, top, right and bottom edges of a centered box.
pub fn edges(center: Point, size: Size) -> (f64, f64, f64, f64) {
    let half_w = size.w / 2.0;
    let half_h = size.h / 2.0;
    (
        center.x - half_w,
        center.y - half_h,
        center.x + half_w,
        center.y + half_h,
    )
}

/// Whether the centered box lies inside the canvas, allowing `tolerance`
/// pixels of rounding slack on every edge.
pub fn box_within(center: Point, size: Size, rect: CanvasRect, tolerance: f64) -> bool {
    let (left, top, right, bottom) = edges(center, size);
    left >= -tolerance
        && top >= -tolerance
        && right <= rect.width + tolerance
        && bottom <= rect.height + tolerance
}

/// Replace a non-finite or non-positive aspect ratio with `1.0`.
pub fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Largest box, in whole pixels, that keeps `center` fixed and stays inside
/// the canvas. Negative when the center itself is outside the canvas.
pub fn max_extent(center: Point, rect: CanvasRect) -> Size {
    Size::new(
        (2.0 * center.x.min(rect.width - center.x)).floor(),
        (2.0 * center.y.min(rect.height - center.y)).floor(),
    )
}

/// Clamp a center so the box of `size` stays inside the canvas.
///
/// When the box is larger than the canvas along an axis, the valid range for
/// that axis collapses to the single point `min(min, max)` rather than
/// inverting.
pub fn clamp_center(center: Point, size: Size, rect: CanvasRect) -> Point {
    if rect.is_empty() {
        return center;
    }
    Point::new(
        clamp_axis(center.x, size.w / 2.0, rect.width),
        clamp_axis(center.y, size.h / 2.0, rect.height),
    )
}

fn clamp_axis(value: f64, half: f64, extent: f64) -> f64 {
    let lo = half;
    let hi = extent - half;
    if lo > hi {
        return lo.min(hi);
    }
    value.max(lo).min(hi)
}

/// Clamp a freeform size around a fixed center.
///
/// The result is the minimum of the request, the largest box the center
/// allows, and the optional natural-size `ceiling`, floored to whole pixels.
/// [`MIN_W`]/[`MIN_H`] always win over the upper bound.
pub fn clamp_size(center: Point, size: Size, rect: CanvasRect, ceiling: Option<Size>) -> Size {
    if rect.is_empty() {
        return size;
    }
    let bound = max_extent(center, rect);
    let mut w = size.w.min(bound.w);
    let mut h = size.h.min(bound.h);
    if let Some(ceiling) = ceiling {
        w = w.min(ceiling.w);
        h = h.min(ceiling.h);
    }
    Size::new(w.floor().max(MIN_W), h.floor().max(MIN_H))
}

/// Aspect-preserving counterpart of [`clamp_size`]. `size.h` drives the
/// result; `size.w` is re-derived from `aspect`.
pub fn clamp_size_locked(
    center: Point,
    size: Size,
    aspect: f64,
    rect: CanvasRect,
    ceiling: Option<Size>,
) -> Size {
    if rect.is_empty() {
        return size;
    }
    fit_aspect(size.h, aspect, max_extent(center, rect), ceiling)
}

/// Fit a box of the given aspect into `bound` (and `ceiling`), driven by a
/// requested height.
///
/// The height is the integer driver: it is clamped to
/// `[ceil(max(MIN_H, MIN_W / aspect)), floor(min(bound.h, floor(bound.w) / aspect))]`
/// with the lower bound winning, then `w = round(h * aspect)`. Because
/// `h >= MIN_H`, the ratio error is at most `0.5 / MIN_H`.
///
/// The width bound is floored before the division, so `h * aspect` never
/// exceeds that integer and rounding cannot push `w` past it. Only the
/// minimum can overshoot the bound, when the bound is below it.
pub fn fit_aspect(target_h: f64, aspect: f64, bound: Size, ceiling: Option<Size>) -> Size {
    let aspect = sanitize_aspect(aspect);
    let mut max_w = bound.w;
    let mut max_h = bound.h;
    if let Some(ceiling) = ceiling {
        max_w = max_w.min(ceiling.w);
        max_h = max_h.min(ceiling.h);
    }
    let h_hi = max_h.min(max_w.floor() / aspect).floor();
    let h_lo = MIN_H.max(MIN_W / aspect).ceil();
    let h = target_h.round().min(h_hi).max(h_lo);
    Size::new((h * aspect).round().max(MIN_W), h)
}

/// Aspect-locked size from a dragged half-width, rounded to whole pixels.
pub fn size_from_half_width(half_w: f64, aspect: f64) -> Size {
    let aspect = sanitize_aspect(aspect);
    let w = 2.0 * half_w.abs();
    Size::new(w.round(), (w / aspect).round())
}

/// Aspect-locked size from a dragged half-height, rounded to whole pixels.
pub fn size_from_half_height(half_h: f64, aspect: f64) -> Size {
    let aspect = sanitize_aspect(aspect);
    let h = 2.0 * half_h.abs();
    Size::new((h * aspect).round(), h.round())
}
