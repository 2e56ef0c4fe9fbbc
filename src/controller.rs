//! The move/resize gesture state machine of one canvas.
//!
//! Pointer samples arrive in client coordinates and are only recorded by
//! [`InteractionController::pointer_move`]. The frame tick calls
//! [`InteractionController::flush_frame`], which converts the latest sample
//! into canvas-local pixels against the boundary as it is *now* and writes
//! one geometry update to the store.

use crate::boundary::CanvasBoundary;
use crate::canvas::CanvasId;
use crate::coalesce::FrameCoalescer;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Point, clamp_center};
use crate::listeners::{GestureListeners, ListenerRegistry};
use crate::resize::ResizeFrame;
use crate::session::{GrabOffset, Handle, ResizePolicy, Session};
use crate::tile::{TileId, TileStore};

#[derive(Debug)]
pub struct InteractionController {
    owner: CanvasId,
    registry: ListenerRegistry,
    session: Session,
    listeners: Option<GestureListeners>,
    samples: FrameCoalescer<Point>,
    writes: u64,
}

impl InteractionController {
    pub fn new(owner: CanvasId, registry: ListenerRegistry) -> Self {
        Self {
            owner,
            registry,
            session: Session::Idle,
            listeners: None,
            samples: FrameCoalescer::new(),
            writes: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_idle()
    }

    pub fn has_listeners(&self) -> bool {
        self.listeners.is_some()
    }

    /// Geometry writes performed so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Pointer samples discarded by per-frame coalescing.
    pub fn coalesced(&self) -> u64 {
        self.samples.coalesced()
    }

    /// `Idle -> Moving`. `client` is the pointer position at pointer-down.
    pub fn start_move(
        &mut self,
        store: &TileStore,
        boundary: &dyn CanvasBoundary,
        tile: TileId,
        client: Point,
    ) -> EngineResult<()> {
        self.ensure_can_start()?;
        let rect = boundary
            .usable_rect()
            .ok_or(EngineError::BoundaryUnavailable)?;
        let center = store
            .get(tile)
            .map(|t| t.position)
            .ok_or(EngineError::DanglingReference(tile))?;
        let grab = GrabOffset::between(rect.to_local(client), center);
        self.begin(Session::Moving { tile, grab });
        tracing::debug!(canvas = %self.owner, tile_id = %tile, dx = grab.dx, dy = grab.dy, "move started");
        Ok(())
    }

    /// `Idle -> Resizing`, capturing the tile's current geometry as origin.
    pub fn start_resize(
        &mut self,
        store: &TileStore,
        tile: TileId,
        handle: Handle,
        policy: ResizePolicy,
    ) -> EngineResult<()> {
        self.ensure_can_start()?;
        let current = store.get(tile).ok_or(EngineError::DanglingReference(tile))?;
        self.begin(Session::Resizing {
            tile,
            handle,
            policy,
            origin_center: current.position,
            origin_size: current.size,
        });
        tracing::debug!(
            canvas = %self.owner,
            tile_id = %tile,
            %handle,
            keep_ratio = policy.keep_ratio,
            anchor_opposite = policy.anchor_opposite,
            "resize started"
        );
        Ok(())
    }

    /// Record a pointer sample. Ignored while idle.
    pub fn pointer_move(&mut self, client: Point) {
        if self.session.is_idle() {
            return;
        }
        self.samples.push(client);
    }

    /// Apply the latest pending sample, if any. Returns whether the store
    /// was written.
    pub fn flush_frame(&mut self, store: &mut TileStore, boundary: &dyn CanvasBoundary) -> bool {
        let Some(client) = self.samples.take() else {
            return false;
        };
        match self.apply_sample(store, boundary, client) {
            Ok(()) => {
                self.writes += 1;
                true
            }
            Err(err) => {
                tracing::trace!(canvas = %self.owner, error = %err, "pointer sample dropped");
                false
            }
        }
    }

    /// `Moving | Resizing -> Idle`. The pending sample is applied first so
    /// the release position is never lost.
    pub fn pointer_up(&mut self, store: &mut TileStore, boundary: &dyn CanvasBoundary) {
        if self.session.is_idle() {
            return;
        }
        self.flush_frame(store, boundary);
        let ended = std::mem::take(&mut self.session);
        self.samples.clear();
        self.listeners = None;
        tracing::debug!(canvas = %self.owner, tile_id = ?ended.tile(), "gesture ended");
    }

    fn ensure_can_start(&self) -> EngineResult<()> {
        if !self.session.is_idle() || self.registry.gesture_in_progress() {
            return Err(EngineError::GestureActive);
        }
        Ok(())
    }

    fn begin(&mut self, session: Session) {
        self.samples.clear();
        self.session = session;
        self.listeners = Some(self.registry.subscribe_gesture(self.owner));
    }

    fn apply_sample(
        &self,
        store: &mut TileStore,
        boundary: &dyn CanvasBoundary,
        client: Point,
    ) -> EngineResult<()> {
        let rect = boundary
            .usable_rect()
            .ok_or(EngineError::BoundaryUnavailable)?;
        let pointer = rect.to_local(client);
        let written = match self.session {
            Session::Idle => return Ok(()),
            Session::Moving { tile, grab } => store.update(tile, |t| {
                t.position = clamp_center(grab.center_for(pointer), t.size, rect);
            }),
            Session::Resizing {
                tile,
                handle,
                policy,
                origin_center,
                origin_size,
            } => store.update(tile, |t| {
                let frame = ResizeFrame {
                    handle,
                    policy,
                    origin_center,
                    origin_size,
                    aspect: t.aspect,
                    nat: t.nat,
                };
                if let Some(placed) = frame.apply(pointer, rect) {
                    t.position = placed.center;
                    t.size = placed.size;
                }
            }),
        };
        match (written, self.session.tile()) {
            (false, Some(tile)) => Err(EngineError::DanglingReference(tile)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::FixedBoundary;
    use crate::geometry::Size;
    use crate::session::Corner;
    use crate::tile::Tile;

    fn setup() -> (InteractionController, TileStore, TileId, ListenerRegistry) {
        let registry = ListenerRegistry::new();
        let ctl = InteractionController::new(CanvasId::from_raw(0), registry.clone());
        let mut store = TileStore::new();
        let tile = Tile::new(
            "a",
            "A",
            Point::new(200.0, 150.0),
            Size::new(160.0, 90.0),
            Size::new(640.0, 360.0),
        );
        let id = tile.id;
        store.push(tile);
        (ctl, store, id, registry)
    }

    #[test]
    fn move_keeps_grab_offset_and_clamps() {
        let (mut ctl, mut store, id, _) = setup();
        let canvas = FixedBoundary::sized(400.0, 300.0);
        ctl.start_move(&store, &canvas, id, Point::new(210.0, 160.0))
            .expect("start move");
        ctl.pointer_move(Point::new(260.0, 170.0));
        assert!(ctl.flush_frame(&mut store, &canvas));
        assert_eq!(store.get(id).map(|t| t.position), Some(Point::new(250.0, 160.0)));
        ctl.pointer_move(Point::new(1000.0, -500.0));
        ctl.pointer_up(&mut store, &canvas);
        assert_eq!(store.get(id).map(|t| t.position), Some(Point::new(320.0, 45.0)));
        assert!(ctl.is_idle());
    }

    #[test]
    fn second_start_is_rejected() {
        let (mut ctl, store, id, _) = setup();
        let canvas = FixedBoundary::sized(400.0, 300.0);
        ctl.start_move(&store, &canvas, id, Point::new(200.0, 150.0))
            .expect("start move");
        let err = ctl.start_resize(
            &store,
            id,
            Handle::Corner(Corner::SouthEast),
            ResizePolicy::default(),
        );
        assert_eq!(err, Err(EngineError::GestureActive));
        assert!(matches!(ctl.session(), Session::Moving { .. }));
    }

    #[test]
    fn samples_without_boundary_are_dropped() {
        let (mut ctl, mut store, id, _) = setup();
        ctl.start_resize(
            &store,
            id,
            Handle::Corner(Corner::SouthEast),
            ResizePolicy::default(),
        )
        .expect("start resize");
        ctl.pointer_move(Point::new(210.0, 160.0));
        assert!(!ctl.flush_frame(&mut store, &FixedBoundary::unmounted()));
        assert_eq!(store.get(id).map(|t| t.size), Some(Size::new(160.0, 90.0)));
    }

    #[test]
    fn deleted_tile_makes_updates_noops_until_pointer_up() {
        let (mut ctl, mut store, id, registry) = setup();
        let canvas = FixedBoundary::sized(400.0, 300.0);
        ctl.start_move(&store, &canvas, id, Point::new(200.0, 150.0))
            .expect("start move");
        store.remove(id);
        ctl.pointer_move(Point::new(10.0, 10.0));
        assert!(!ctl.flush_frame(&mut store, &canvas));
        assert!(!ctl.is_idle());
        assert_eq!(registry.active_count(), 2);
        ctl.pointer_up(&mut store, &canvas);
        assert!(ctl.is_idle());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn idle_moves_are_ignored() {
        let (mut ctl, mut store, _, _) = setup();
        ctl.pointer_move(Point::new(1.0, 1.0));
        assert!(!ctl.flush_frame(&mut store, &FixedBoundary::sized(400.0, 300.0)));
        assert_eq!(ctl.writes(), 0);
    }
}
