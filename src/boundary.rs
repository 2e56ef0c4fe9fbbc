use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::CanvasRect;

/// Supplies the current pixel rectangle of a canvas.
///
/// The rectangle may change between reads (the host reflows), so callers
/// query it for every sample instead of caching it.
pub trait CanvasBoundary {
    /// `None` when the canvas has not been laid out yet.
    fn rect(&self) -> Option<CanvasRect>;

    /// The rectangle, if it is present and has a positive area.
    fn usable_rect(&self) -> Option<CanvasRect> {
        self.rect().filter(|r| !r.is_empty())
    }
}

impl<F> CanvasBoundary for F
where
    F: Fn() -> Option<CanvasRect>,
{
    fn rect(&self) -> Option<CanvasRect> {
        self()
    }
}

/// A rectangle that never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBoundary(pub Option<CanvasRect>);

impl FixedBoundary {
    pub fn sized(width: f64, height: f64) -> Self {
        Self(Some(CanvasRect::sized(width, height)))
    }

    pub fn unmounted() -> Self {
        Self(None)
    }
}

impl CanvasBoundary for FixedBoundary {
    fn rect(&self) -> Option<CanvasRect> {
        self.0
    }
}

/// A rectangle written by the layout pass and read by the engine.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedBoundary {
    slot: Rc<Cell<Option<CanvasRect>>>,
}

impl SharedBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, rect: CanvasRect) {
        self.slot.set(Some(rect));
    }

    pub fn clear(&self) {
        self.slot.set(None);
    }
}

impl CanvasBoundary for SharedBoundary {
    fn rect(&self) -> Option<CanvasRect> {
        self.slot.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_boundary_reflects_latest_layout() {
        let layout = SharedBoundary::new();
        let engine_side = layout.clone();
        assert_eq!(engine_side.rect(), None);
        layout.set(CanvasRect::sized(320.0, 200.0));
        assert_eq!(engine_side.usable_rect(), Some(CanvasRect::sized(320.0, 200.0)));
        layout.set(CanvasRect::sized(0.0, 200.0));
        assert_eq!(engine_side.usable_rect(), None);
        layout.clear();
        assert_eq!(engine_side.rect(), None);
    }

    #[test]
    fn closures_are_boundaries() {
        let boundary = || Some(CanvasRect::new(10.0, 10.0, 50.0, 40.0));
        assert_eq!(boundary.usable_rect().map(|r| r.width), Some(50.0));
    }
}
