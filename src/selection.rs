use crate::tile::TileId;

/// The single selected tile of a canvas, if any. Only a marker; the tile
/// store owns the tile.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    selected: Option<TileId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<TileId> {
        self.selected
    }

    pub fn is_selected(&self, id: TileId) -> bool {
        self.selected == Some(id)
    }

    pub fn select(&mut self, id: TileId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Clear only if `id` is the current selection.
    pub fn clear_if(&mut self, id: TileId) -> bool {
        if self.is_selected(id) {
            self.selected = None;
            true
        } else {
            false
        }
    }

    pub fn take(&mut self) -> Option<TileId> {
        self.selected.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_if_only_touches_matching_id() {
        let a = TileId::from_raw(1);
        let b = TileId::from_raw(2);
        let mut sel = Selection::new();
        sel.select(a);
        assert!(!sel.clear_if(b));
        assert_eq!(sel.get(), Some(a));
        assert!(sel.clear_if(a));
        assert_eq!(sel.get(), None);
    }
}
