//! Pointer-to-geometry math for an active resize gesture.
//!
//! Every sample is computed from the geometry captured at gesture start, never
//! from the previous sample, so rounding does not accumulate over a drag.

use crate::constants::{MIN_H, MIN_W};
use crate::geometry::{
    CanvasRect, Point, Size, box_within, clamp_center, clamp_size, clamp_size_locked, edges,
    fit_aspect, size_from_half_height, size_from_half_width,
};
use crate::session::{DriveAxis, Handle, ResizePolicy};

/// Resulting tile geometry for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point,
    pub size: Size,
}

/// Reference frame of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeFrame {
    pub handle: Handle,
    pub policy: ResizePolicy,
    pub origin_center: Point,
    pub origin_size: Size,
    pub aspect: f64,
    pub nat: Size,
}

impl ResizeFrame {
    /// Geometry for a canvas-local pointer sample. `None` when the canvas has
    /// no usable rectangle; the caller should leave the tile untouched.
    pub fn apply(&self, pointer: Point, rect: CanvasRect) -> Option<Placement> {
        if rect.is_empty() {
            return None;
        }
        let placement = if self.policy.anchor_opposite {
            self.anchored(pointer, rect)
        } else if self.policy.keep_ratio {
            self.centered_locked(pointer, rect)
        } else {
            self.centered_freeform(pointer, rect)
        };
        Some(contain(placement, rect))
    }

    fn centered_locked(&self, pointer: Point, rect: CanvasRect) -> Placement {
        let center = self.origin_center;
        let requested = match self.handle.drive_axis() {
            DriveAxis::Horizontal | DriveAxis::Both => {
                size_from_half_width(pointer.x - center.x, self.aspect)
            }
            DriveAxis::Vertical => size_from_half_height(pointer.y - center.y, self.aspect),
        };
        let size = clamp_size_locked(center, requested, self.aspect, rect, Some(self.nat));
        Placement { center, size }
    }

    fn centered_freeform(&self, pointer: Point, rect: CanvasRect) -> Placement {
        let center = self.origin_center;
        let dragged_w = 2.0 * (pointer.x - center.x).abs();
        let dragged_h = 2.0 * (pointer.y - center.y).abs();
        let requested = match self.handle.drive_axis() {
            DriveAxis::Both => Size::new(dragged_w, dragged_h),
            DriveAxis::Horizontal => Size::new(dragged_w, self.origin_size.h),
            DriveAxis::Vertical => Size::new(self.origin_size.w, dragged_h),
        };
        let size = clamp_size(center, requested, rect, Some(self.nat));
        Placement { center, size }
    }

    fn anchored(&self, pointer: Point, rect: CanvasRect) -> Placement {
        let pointer = Point::new(
            pointer.x.clamp(0.0, rect.width),
            pointer.y.clamp(0.0, rect.height),
        );
        let (left, top, right, bottom) = edges(self.origin_center, self.origin_size);
        let (dir_x, dir_y) = self.handle.direction();
        // The pinned coordinate on each axis the handle drives.
        let anchor_x = (dir_x != 0.0).then(|| if dir_x > 0.0 { left } else { right });
        let anchor_y = (dir_y != 0.0).then(|| if dir_y > 0.0 { top } else { bottom });

        let max_w = rect.width.min(self.nat.w);
        let max_h = rect.height.min(self.nat.h);
        let span = |p: f64, a: Option<f64>, fallback: f64, max: f64, min: f64| match a {
            Some(a) => (p - a).abs().min(max).floor().max(min),
            None => fallback,
        };

        let size = if self.policy.keep_ratio {
            let target_h = match self.handle.drive_axis() {
                DriveAxis::Vertical => span(pointer.y, anchor_y, self.origin_size.h, max_h, MIN_H),
                _ => span(pointer.x, anchor_x, self.origin_size.w, max_w, MIN_W) / self.aspect,
            };
            fit_aspect(target_h, self.aspect, Size::new(rect.width, rect.height), Some(self.nat))
        } else {
            Size::new(
                span(pointer.x, anchor_x, self.origin_size.w, max_w, MIN_W),
                span(pointer.y, anchor_y, self.origin_size.h, max_h, MIN_H),
            )
        };

        let place = |p: f64, a: Option<f64>, origin: f64, extent: f64| match a {
            Some(a) => {
                let sign = if p >= a { 1.0 } else { -1.0 };
                a + sign * extent / 2.0
            }
            None => origin,
        };
        let center = Point::new(
            place(pointer.x, anchor_x, self.origin_center.x, size.w),
            place(pointer.y, anchor_y, self.origin_center.y, size.h),
        );
        Placement {
            center: clamp_center(center, size, rect),
            size,
        }
    }
}

/// Re-clamp the center when the minimum size pushed the box out of the canvas.
fn contain(placement: Placement, rect: CanvasRect) -> Placement {
    if box_within(placement.center, placement.size, rect, 0.0) {
        return placement;
    }
    Placement {
        center: clamp_center(placement.center, placement.size, rect),
        size: placement.size,
    }
}
