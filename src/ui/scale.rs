use ratatui::layout::Rect;

use crate::geometry::{CanvasRect, Point, Size, edges};

/// Pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub cell_w: f64,
    pub cell_h: f64,
}

impl CellScale {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1) as f64,
            cell_h: cell_h.max(1) as f64,
        }
    }

    /// Client pixel position of a mouse event: the center of its cell.
    pub fn pointer(&self, column: u16, row: u16) -> Point {
        Point::new(
            (column as f64 + 0.5) * self.cell_w,
            (row as f64 + 0.5) * self.cell_h,
        )
    }

    /// Client pixel rectangle covered by a block of cells.
    pub fn canvas_rect(&self, area: Rect) -> CanvasRect {
        CanvasRect::new(
            area.x as f64 * self.cell_w,
            area.y as f64 * self.cell_h,
            area.width as f64 * self.cell_w,
            area.height as f64 * self.cell_h,
        )
    }

    /// Cells covered by a tile of a canvas drawn in `canvas_area`, clipped to
    /// that area.
    pub fn tile_cells(&self, canvas_area: Rect, center: Point, size: Size) -> Rect {
        let (left, top, right, bottom) = edges(center, size);
        let to_col = |px: f64| (px / self.cell_w).round().max(0.0) as u32;
        let to_row = |px: f64| (px / self.cell_h).round().max(0.0) as u32;
        let (c0, c1) = (to_col(left), to_col(right).max(to_col(left) + 1));
        let (r0, r1) = (to_row(top), to_row(bottom).max(to_row(top) + 1));
        let x0 = (canvas_area.x as u32 + c0).min(u16::MAX as u32) as u16;
        let y0 = (canvas_area.y as u32 + r0).min(u16::MAX as u32) as u16;
        let rect = Rect::new(
            x0,
            y0,
            (c1 - c0).min(u16::MAX as u32) as u16,
            (r1 - r0).min(u16::MAX as u32) as u16,
        );
        rect.intersection(canvas_area)
    }
}
