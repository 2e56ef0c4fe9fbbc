//! One bounded drop/interaction surface.

use std::fmt;

use crate::boundary::CanvasBoundary;
use crate::controller::InteractionController;
use crate::drop::{DropTicket, PendingDrop, ResolvedDrop, SourceDescriptor, initial_size};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{CanvasRect, Point, clamp_center};
use crate::listeners::ListenerRegistry;
use crate::selection::Selection;
use crate::session::{Handle, ResizePolicy, Session};
use crate::tile::{Tile, TileId, TileSnapshot, TileStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(usize);

impl CanvasId {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canvas-{}", self.0)
    }
}

pub struct Canvas {
    id: CanvasId,
    name: String,
    capacity: usize,
    boundary: Box<dyn CanvasBoundary>,
    store: TileStore,
    selection: Selection,
    controller: InteractionController,
    pending_drops: usize,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("tiles", &self.store.len())
            .field("pending_drops", &self.pending_drops)
            .field("session", self.controller.session())
            .finish()
    }
}

impl Canvas {
    pub fn new(
        id: CanvasId,
        name: impl Into<String>,
        capacity: usize,
        boundary: impl CanvasBoundary + 'static,
        registry: ListenerRegistry,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            boundary: Box::new(boundary),
            store: TileStore::new(),
            selection: Selection::new(),
            controller: InteractionController::new(id, registry),
            pending_drops: 0,
        }
    }

    /// A canvas with its own private listener registry.
    pub fn standalone(
        name: impl Into<String>,
        capacity: usize,
        boundary: impl CanvasBoundary + 'static,
    ) -> Self {
        Self::new(
            CanvasId::from_raw(0),
            name,
            capacity,
            boundary,
            ListenerRegistry::new(),
        )
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn rect(&self) -> Option<CanvasRect> {
        self.boundary.usable_rect()
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn tiles(&self) -> TileSnapshot {
        self.store.snapshot()
    }

    pub fn selected(&self) -> Option<TileId> {
        self.selection.get()
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Placed tiles plus drops still resolving.
    pub fn occupancy(&self) -> usize {
        self.store.len() + self.pending_drops
    }

    pub fn pending_drops(&self) -> usize {
        self.pending_drops
    }

    /// Pointer-down on a tile body: start a move, bring the tile to front and
    /// select it. Nothing changes if the move cannot start.
    pub fn pointer_down_on_tile(&mut self, tile: TileId, client: Point) -> EngineResult<()> {
        self.controller
            .start_move(&self.store, self.boundary.as_ref(), tile, client)?;
        self.front_and_select(tile);
        Ok(())
    }

    /// Pointer-down on a resize handle of `tile`.
    pub fn pointer_down_on_handle(
        &mut self,
        tile: TileId,
        handle: Handle,
        policy: ResizePolicy,
    ) -> EngineResult<()> {
        self.controller
            .start_resize(&self.store, tile, handle, policy)?;
        self.front_and_select(tile);
        Ok(())
    }

    pub fn pointer_down_on_empty(&mut self) {
        self.selection.clear();
    }

    pub fn pointer_move(&mut self, client: Point) {
        self.controller.pointer_move(client);
    }

    pub fn flush_frame(&mut self) -> bool {
        self.controller
            .flush_frame(&mut self.store, self.boundary.as_ref())
    }

    pub fn pointer_up(&mut self) {
        self.controller
            .pointer_up(&mut self.store, self.boundary.as_ref());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Delete key: remove the selected tile, if any.
    pub fn delete_selected(&mut self) -> Option<TileId> {
        let id = self.selection.take()?;
        self.store.remove(id)?;
        tracing::info!(canvas = %self.name, tile_id = %id, "tile deleted");
        Some(id)
    }

    /// Per-tile remove control.
    pub fn remove_tile(&mut self, id: TileId) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        self.selection.clear_if(id);
        tracing::info!(canvas = %self.name, tile_id = %id, "tile removed");
        true
    }

    /// Reserve a slot for a drop at `client` and capture its canvas-local
    /// point. The reservation is released by [`complete_drop`](Self::complete_drop).
    pub fn begin_drop(
        &mut self,
        descriptor: SourceDescriptor,
        client: Point,
    ) -> EngineResult<PendingDrop> {
        if self.occupancy() >= self.capacity {
            return Err(EngineError::CapacityExceeded {
                canvas: self.name.clone(),
                limit: self.capacity,
            });
        }
        let rect = self.rect().ok_or(EngineError::BoundaryUnavailable)?;
        self.pending_drops += 1;
        let pending = PendingDrop {
            ticket: DropTicket::next(),
            canvas: self.id,
            descriptor,
            local_point: rect.to_local(client),
            rect_at_drop: rect,
        };
        tracing::debug!(
            canvas = %self.name,
            ticket = %pending.ticket,
            src = %pending.descriptor.src,
            "drop reserved"
        );
        Ok(pending)
    }

    /// Place a resolved drop as a new, selected tile.
    pub fn complete_drop(&mut self, resolved: ResolvedDrop) -> TileId {
        self.pending_drops = self.pending_drops.saturating_sub(1);
        let ResolvedDrop { pending, nat, .. } = resolved;
        let rect = self.rect().unwrap_or(pending.rect_at_drop);
        let size = initial_size(nat, rect);
        let center = clamp_center(pending.local_point, size, rect);
        let tile = Tile::new(
            pending.descriptor.src,
            pending.descriptor.name,
            center,
            size,
            nat,
        );
        let id = tile.id;
        self.store.push(tile);
        self.selection.select(id);
        tracing::info!(
            canvas = %self.name,
            tile_id = %id,
            w = size.w,
            h = size.h,
            "tile placed"
        );
        id
    }

    /// Topmost tile under a client-space point.
    pub fn tile_at(&self, client: Point) -> Option<TileId> {
        let rect = self.rect()?;
        self.store.topmost_at(rect.to_local(client)).map(|t| t.id)
    }

    fn front_and_select(&mut self, tile: TileId) {
        self.store.move_to_end(tile);
        self.selection.select(tile);
    }
}
