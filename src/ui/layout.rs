use ratatui::layout::Rect;

use crate::canvas::CanvasId;

const SIDEBAR_MAX_WIDTH: u16 = 24;
/// Share of the main area given to the wall when monitors are shown.
const WALL_PERCENT: u16 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasArea {
    pub id: CanvasId,
    /// Bordered frame, including the title row.
    pub frame: Rect,
    /// Drawable canvas surface inside the border.
    pub inner: Rect,
}

/// Screen regions of the host, recomputed on every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLayout {
    pub sidebar: Rect,
    pub source_rows: Vec<Rect>,
    pub canvases: Vec<CanvasArea>,
    pub status: Rect,
}

impl HostLayout {
    /// Sidebar on the left, status bar on the last row, the first canvas
    /// (the wall) above the remaining canvases laid out side by side.
    pub fn compute(area: Rect, canvases: &[CanvasId], sources: usize) -> Self {
        if area.width < 4 || area.height < 3 {
            return Self::default();
        }
        let status = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let body_h = area.height - 1;
        let sidebar_w = SIDEBAR_MAX_WIDTH.min(area.width / 4);
        let sidebar = Rect::new(area.x, area.y, sidebar_w, body_h);
        let sidebar_inner = shrink(sidebar);
        let source_rows = (0..sources as u16)
            .take(sidebar_inner.height as usize)
            .map(|i| Rect::new(sidebar_inner.x, sidebar_inner.y + i, sidebar_inner.width, 1))
            .collect();

        let main = Rect::new(
            area.x + sidebar_w,
            area.y,
            area.width - sidebar_w,
            body_h,
        );
        let mut regions = Vec::with_capacity(canvases.len());
        if let Some((wall, monitors)) = canvases.split_first() {
            let wall_h = if monitors.is_empty() {
                main.height
            } else {
                main.height * WALL_PERCENT / 100
            };
            let wall_frame = Rect::new(main.x, main.y, main.width, wall_h);
            regions.push(CanvasArea {
                id: *wall,
                frame: wall_frame,
                inner: shrink(wall_frame),
            });
            if !monitors.is_empty() {
                let row_y = main.y + wall_h;
                let row_h = main.height - wall_h;
                let count = monitors.len() as u16;
                let each = main.width / count;
                for (i, id) in monitors.iter().enumerate() {
                    let i = i as u16;
                    let x = main.x + i * each;
                    // the last monitor absorbs the rounding remainder
                    let w = if i + 1 == count {
                        main.right() - x
                    } else {
                        each
                    };
                    let frame = Rect::new(x, row_y, w, row_h);
                    regions.push(CanvasArea {
                        id: *id,
                        frame,
                        inner: shrink(frame),
                    });
                }
            }
        }

        Self {
            sidebar,
            source_rows,
            canvases: regions,
            status,
        }
    }

    pub fn canvas_at(&self, column: u16, row: u16) -> Option<&CanvasArea> {
        self.canvases
            .iter()
            .find(|c| contains(c.inner, column, row))
    }

    pub fn canvas_area(&self, id: CanvasId) -> Option<&CanvasArea> {
        self.canvases.iter().find(|c| c.id == id)
    }

    pub fn source_at(&self, column: u16, row: u16) -> Option<usize> {
        self.source_rows
            .iter()
            .position(|r| contains(*r, column, row))
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn shrink(rect: Rect) -> Rect {
    Rect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    )
}
