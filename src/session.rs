//! Gesture session state.

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Point, Size};
use crate::tile::TileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    East,
    South,
    West,
}

/// The resize affordance grabbed at gesture start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Corner(Corner),
    Side(Side),
}

/// Which pointer axes a handle follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveAxis {
    Horizontal,
    Vertical,
    Both,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Corner(Corner::NorthWest),
        Handle::Side(Side::North),
        Handle::Corner(Corner::NorthEast),
        Handle::Side(Side::East),
        Handle::Corner(Corner::SouthEast),
        Handle::Side(Side::South),
        Handle::Corner(Corner::SouthWest),
        Handle::Side(Side::West),
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::Corner(_))
    }

    pub fn drive_axis(self) -> DriveAxis {
        match self {
            Handle::Corner(_) => DriveAxis::Both,
            Handle::Side(Side::East | Side::West) => DriveAxis::Horizontal,
            Handle::Side(Side::North | Side::South) => DriveAxis::Vertical,
        }
    }

    /// Unit direction from the tile center towards the handle, per axis.
    /// `0` means the handle does not sit on that axis.
    pub fn direction(self) -> (f64, f64) {
        match self {
            Handle::Corner(Corner::NorthWest) => (-1.0, -1.0),
            Handle::Corner(Corner::NorthEast) => (1.0, -1.0),
            Handle::Corner(Corner::SouthWest) => (-1.0, 1.0),
            Handle::Corner(Corner::SouthEast) => (1.0, 1.0),
            Handle::Side(Side::North) => (0.0, -1.0),
            Handle::Side(Side::South) => (0.0, 1.0),
            Handle::Side(Side::East) => (1.0, 0.0),
            Handle::Side(Side::West) => (-1.0, 0.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Handle::Corner(Corner::NorthWest) => "nw",
            Handle::Corner(Corner::NorthEast) => "ne",
            Handle::Corner(Corner::SouthWest) => "sw",
            Handle::Corner(Corner::SouthEast) => "se",
            Handle::Side(Side::North) => "n",
            Handle::Side(Side::East) => "e",
            Handle::Side(Side::South) => "s",
            Handle::Side(Side::West) => "w",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resize handle '{s}'"))
    }
}

/// Resize behavior for one gesture.
///
/// The default is aspect-locked with the center held fixed. `keep_ratio =
/// false` resizes freeform; `anchor_opposite = true` pins the edge or corner
/// opposite the grabbed handle instead of the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePolicy {
    pub keep_ratio: bool,
    pub anchor_opposite: bool,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            keep_ratio: true,
            anchor_opposite: false,
        }
    }
}

impl ResizePolicy {
    pub const FREEFORM: ResizePolicy = ResizePolicy {
        keep_ratio: false,
        anchor_opposite: false,
    };

    /// Apply the pointer-down modifiers on top of `self`: Shift resizes
    /// freeform, Alt anchors the opposite handle.
    pub fn with_modifiers(self, shift: bool, alt: bool) -> Self {
        Self {
            keep_ratio: self.keep_ratio && !shift,
            anchor_opposite: self.anchor_opposite || alt,
        }
    }
}

/// Pointer offset from the tile center at grab time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrabOffset {
    pub dx: f64,
    pub dy: f64,
}

impl GrabOffset {
    pub fn between(pointer: Point, center: Point) -> Self {
        Self {
            dx: pointer.x - center.x,
            dy: pointer.y - center.y,
        }
    }

    pub fn center_for(&self, pointer: Point) -> Point {
        Point::new(pointer.x - self.dx, pointer.y - self.dy)
    }
}

/// The single active gesture of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    Moving {
        tile: TileId,
        grab: GrabOffset,
    },
    Resizing {
        tile: TileId,
        handle: Handle,
        policy: ResizePolicy,
        origin_center: Point,
        origin_size: Size,
    },
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    pub fn tile(&self) -> Option<TileId> {
        match self {
            Session::Idle => None,
            Session::Moving { tile, .. } | Session::Resizing { tile, .. } => Some(*tile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_labels_parse_back() {
        for h in Handle::ALL {
            assert_eq!(h.label().parse::<Handle>(), Ok(h));
        }
        assert_eq!("SE".parse::<Handle>(), Ok(Handle::Corner(Corner::SouthEast)));
        assert!("middle".parse::<Handle>().is_err());
    }

    #[test]
    fn modifiers_toggle_policy() {
        let base = ResizePolicy::default();
        assert_eq!(base.with_modifiers(false, false), base);
        assert!(!base.with_modifiers(true, false).keep_ratio);
        assert!(base.with_modifiers(false, true).anchor_opposite);
        // Shift never re-enables ratio on a freeform default.
        assert!(!ResizePolicy::FREEFORM.with_modifiers(false, false).keep_ratio);
    }

    #[test]
    fn grab_offset_keeps_tile_under_pointer() {
        let grab = GrabOffset::between(Point::new(110.0, 95.0), Point::new(100.0, 100.0));
        assert_eq!(grab.center_for(Point::new(210.0, 195.0)), Point::new(200.0, 200.0));
    }
}
