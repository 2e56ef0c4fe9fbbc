use std::sync::Arc;

use super::{Tile, TileId};

/// Shared, immutable view of the tile list at one point in time.
pub type TileSnapshot = Arc<Vec<Tile>>;

/// Ordered tile collection. Later entries stack above earlier ones.
///
/// Every mutation goes through [`Arc::make_mut`], so a [`TileSnapshot`] held
/// by a renderer keeps its old contents while the store writes a fresh copy.
#[derive(Debug, Default, Clone)]
pub struct TileStore {
    tiles: TileSnapshot,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn snapshot(&self) -> TileSnapshot {
        Arc::clone(&self.tiles)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> Vec<TileId> {
        self.tiles.iter().map(|t| t.id).collect()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    pub fn push(&mut self, tile: Tile) {
        Arc::make_mut(&mut self.tiles).push(tile);
    }

    /// Apply `f` to the tile with `id`. Returns `false` (and copies nothing)
    /// when the id is not present.
    pub fn update(&mut self, id: TileId, f: impl FnOnce(&mut Tile)) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        f(&mut Arc::make_mut(&mut self.tiles)[idx]);
        true
    }

    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let idx = self.index_of(id)?;
        Some(Arc::make_mut(&mut self.tiles).remove(idx))
    }

    /// Move `id` to the top of the stacking order. The relative order of all
    /// other tiles is unchanged. Returns `false` when the id is not present.
    pub fn move_to_end(&mut self, id: TileId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if idx + 1 == self.tiles.len() {
            return true;
        }
        let tiles = Arc::make_mut(&mut self.tiles);
        let tile = tiles.remove(idx);
        tiles.push(tile);
        true
    }

    /// Topmost tile whose box contains the canvas-local point.
    pub fn topmost_at(&self, point: crate::geometry::Point) -> Option<&Tile> {
        self.tiles.iter().rev().find(|t| t.hit(point))
    }

    fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }
}
