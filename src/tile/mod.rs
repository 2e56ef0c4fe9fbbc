mod store;

pub use store::{TileSnapshot, TileStore};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::{Point, Size};

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque tile identity, unique across every canvas of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u64);

impl TileId {
    pub fn next() -> Self {
        Self(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One placed image on a canvas.
///
/// `position` is the center in canvas-local pixels. `src`, `name`, `aspect`
/// and `nat` are fixed at creation; only `position` and `size` change.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub src: String,
    pub name: String,
    pub position: Point,
    pub size: Size,
    pub aspect: f64,
    pub nat: Size,
}

impl Tile {
    pub fn new(src: impl Into<String>, name: impl Into<String>, position: Point, size: Size, nat: Size) -> Self {
        Self {
            id: TileId::next(),
            src: src.into(),
            name: name.into(),
            position,
            size,
            aspect: nat.aspect(),
            nat,
        }
    }

    /// Whether `point` (canvas-local) lies inside the tile's box.
    pub fn hit(&self, point: Point) -> bool {
        let (left, top, right, bottom) = crate::geometry::edges(self.position, self.size);
        point.x >= left && point.x < right && point.y >= top && point.y < bottom
    }
}
