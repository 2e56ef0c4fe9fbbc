//! Cell-level hit zones of a drawn tile: resize handles on the border of the
//! selected tile, the remove control and the tile body.

use ratatui::layout::Rect;

use super::layout::{CanvasArea, contains};
use super::scale::CellScale;
use crate::canvas::Canvas;
use crate::session::{Corner, Handle, Side};
use crate::tile::TileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Remove(TileId),
    Handle(TileId, Handle),
    Body(TileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleZone {
    pub rect: Rect,
    pub handle: Handle,
}

/// Cell of the remove control: on the top border, left of the corner.
pub fn remove_cell(rect: Rect) -> Option<(u16, u16)> {
    (rect.width >= 4 && rect.height >= 1).then(|| (rect.right() - 2, rect.y))
}

/// Border cells that start a resize. Corners are single cells; sides span
/// the border between them.
pub fn handle_zones(rect: Rect) -> Vec<HandleZone> {
    let mut zones = Vec::with_capacity(8);
    if rect.width == 0 || rect.height == 0 {
        return zones;
    }
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    let cell = |x, y| Rect::new(x, y, 1, 1);
    zones.push(HandleZone {
        rect: cell(rect.x, rect.y),
        handle: Handle::Corner(Corner::NorthWest),
    });
    zones.push(HandleZone {
        rect: cell(right, rect.y),
        handle: Handle::Corner(Corner::NorthEast),
    });
    zones.push(HandleZone {
        rect: cell(rect.x, bottom),
        handle: Handle::Corner(Corner::SouthWest),
    });
    zones.push(HandleZone {
        rect: cell(right, bottom),
        handle: Handle::Corner(Corner::SouthEast),
    });
    if rect.width > 2 {
        zones.push(HandleZone {
            rect: Rect::new(rect.x + 1, rect.y, rect.width - 2, 1),
            handle: Handle::Side(Side::North),
        });
        zones.push(HandleZone {
            rect: Rect::new(rect.x + 1, bottom, rect.width - 2, 1),
            handle: Handle::Side(Side::South),
        });
    }
    if rect.height > 2 {
        zones.push(HandleZone {
            rect: Rect::new(rect.x, rect.y + 1, 1, rect.height - 2),
            handle: Handle::Side(Side::West),
        });
        zones.push(HandleZone {
            rect: Rect::new(right, rect.y + 1, 1, rect.height - 2),
            handle: Handle::Side(Side::East),
        });
    }
    zones
}

/// Resolve a click on one tile. The remove control wins over handles, and
/// handles are only live on the selected tile.
pub fn hit_tile(id: TileId, rect: Rect, selected: bool, column: u16, row: u16) -> Option<HitTarget> {
    if !contains(rect, column, row) {
        return None;
    }
    if remove_cell(rect) == Some((column, row)) {
        return Some(HitTarget::Remove(id));
    }
    if selected {
        // corners are listed first so they win over the sides they touch
        if let Some(zone) = handle_zones(rect)
            .into_iter()
            .find(|z| contains(z.rect, column, row))
        {
            return Some(HitTarget::Handle(id, zone.handle));
        }
    }
    Some(HitTarget::Body(id))
}

/// Cell rectangles of every tile of `canvas`, bottom of the stack first.
pub fn tile_rects(canvas: &Canvas, area: &CanvasArea, scale: CellScale) -> Vec<(TileId, Rect)> {
    canvas
        .store()
        .iter()
        .map(|tile| (tile.id, scale.tile_cells(area.inner, tile.position, tile.size)))
        .filter(|(_, rect)| rect.width > 0 && rect.height > 0)
        .collect()
}

/// Resolve a click inside a canvas against its tiles, topmost first.
pub fn hit_canvas(
    canvas: &Canvas,
    area: &CanvasArea,
    scale: CellScale,
    column: u16,
    row: u16,
) -> Option<HitTarget> {
    let selected = canvas.selected();
    tile_rects(canvas, area, scale)
        .into_iter()
        .rev()
        .find_map(|(id, rect)| hit_tile(id, rect, selected == Some(id), column, row))
}
