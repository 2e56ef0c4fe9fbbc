//! A set of canvases sharing one listener registry, one drop resolver and a
//! single process-wide gesture.

use std::sync::Arc;
use std::time::Duration;

use crate::boundary::CanvasBoundary;
use crate::canvas::{Canvas, CanvasId};
use crate::config::{CanvasConfig, EditorConfig};
use crate::drop::{DropResolver, DropTicket, ResolvedDrop, SourceDescriptor};
use crate::error::{EngineError, EngineResult};
use crate::geometry::Point;
use crate::listeners::{ListenerKind, ListenerRegistry};
use crate::probe::NaturalSizeProbe;
use crate::session::{Handle, ResizePolicy};
use crate::tile::TileId;

/// User-visible message raised by a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub canvas: CanvasId,
    pub message: String,
}

/// Keyboard modifiers held at pointer-down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// What one frame tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub geometry_writes: usize,
    pub placed: Vec<TileId>,
}

pub struct Workspace {
    canvases: Vec<Canvas>,
    registry: ListenerRegistry,
    resolver: DropResolver,
    notices: Vec<Notice>,
    dragging: Option<SourceDescriptor>,
    resize_policy: ResizePolicy,
    modifiers_enabled: bool,
    next_canvas: usize,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("canvases", &self.canvases)
            .field("resolver", &self.resolver)
            .field("dragging", &self.dragging)
            .finish()
    }
}

impl Workspace {
    pub fn new(probe: Arc<dyn NaturalSizeProbe>) -> Self {
        Self {
            canvases: Vec::new(),
            registry: ListenerRegistry::new(),
            resolver: DropResolver::new(probe),
            notices: Vec::new(),
            dragging: None,
            resize_policy: ResizePolicy::default(),
            modifiers_enabled: true,
            next_canvas: 0,
        }
    }

    /// Build the wall and monitor canvases of `config`. `boundary` supplies
    /// the rectangle provider for each canvas.
    pub fn from_config<B>(
        config: &EditorConfig,
        probe: Arc<dyn NaturalSizeProbe>,
        mut boundary: impl FnMut(&CanvasConfig) -> B,
    ) -> Self
    where
        B: CanvasBoundary + 'static,
    {
        let mut workspace = Self::new(probe);
        workspace.resize_policy = config.resize_policy;
        workspace.modifiers_enabled = config.modifiers;
        for canvas in config.canvases() {
            let provider = boundary(canvas);
            workspace.add_canvas(canvas.name.clone(), canvas.capacity, provider);
        }
        workspace
    }

    pub fn add_canvas(
        &mut self,
        name: impl Into<String>,
        capacity: usize,
        boundary: impl CanvasBoundary + 'static,
    ) -> CanvasId {
        let id = CanvasId::from_raw(self.next_canvas);
        self.next_canvas += 1;
        self.canvases.push(Canvas::new(
            id,
            name,
            capacity,
            boundary,
            self.registry.clone(),
        ));
        id
    }

    /// Tear a canvas down. Any gesture it owns ends with it.
    pub fn remove_canvas(&mut self, id: CanvasId) -> Option<Canvas> {
        let idx = self.canvases.iter().position(|c| c.id() == id)?;
        Some(self.canvases.remove(idx))
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    pub fn canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == id)
    }

    pub fn canvas_mut(&mut self, id: CanvasId) -> EngineResult<&mut Canvas> {
        self.canvases
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(EngineError::UnknownCanvas(id))
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        self.resize_policy
    }

    pub fn set_resize_policy(&mut self, policy: ResizePolicy) {
        self.resize_policy = policy;
    }

    pub fn pending_drops(&self) -> usize {
        self.resolver.in_flight()
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.registry.gesture_in_progress()
    }

    /// A source drag started in the source list.
    pub fn begin_source_drag(&mut self, descriptor: SourceDescriptor) {
        tracing::debug!(src = %descriptor.src, "source drag started");
        self.dragging = Some(descriptor);
    }

    pub fn dragging(&self) -> Option<&SourceDescriptor> {
        self.dragging.as_ref()
    }

    pub fn cancel_source_drag(&mut self) -> Option<SourceDescriptor> {
        self.dragging.take()
    }

    /// Release the current source drag over `canvas`. `Ok(None)` when no
    /// source was being dragged.
    pub fn drop_dragged(
        &mut self,
        canvas: CanvasId,
        client: Point,
    ) -> EngineResult<Option<DropTicket>> {
        let Some(descriptor) = self.dragging.take() else {
            return Ok(None);
        };
        self.drop_source(canvas, descriptor, client).map(Some)
    }

    /// Drop `descriptor` on `canvas` at a client-space point. Capacity
    /// rejections are also queued as a [`Notice`].
    pub fn drop_source(
        &mut self,
        canvas: CanvasId,
        descriptor: SourceDescriptor,
        client: Point,
    ) -> EngineResult<DropTicket> {
        let target = self.canvas_mut(canvas)?;
        match target.begin_drop(descriptor, client) {
            Ok(pending) => {
                let ticket = pending.ticket;
                self.resolver.submit(pending);
                Ok(ticket)
            }
            Err(err) => {
                if err.is_user_facing() {
                    tracing::info!(%canvas, "{err}");
                    self.notices.push(Notice {
                        canvas,
                        message: err.to_string(),
                    });
                } else {
                    tracing::debug!(%canvas, error = %err, "drop discarded");
                }
                Err(err)
            }
        }
    }

    pub fn pointer_down_on_tile(
        &mut self,
        canvas: CanvasId,
        tile: TileId,
        client: Point,
    ) -> EngineResult<()> {
        self.canvas_mut(canvas)?.pointer_down_on_tile(tile, client)?;
        self.clear_selection_except(canvas);
        Ok(())
    }

    pub fn pointer_down_on_handle(
        &mut self,
        canvas: CanvasId,
        tile: TileId,
        handle: Handle,
        modifiers: Modifiers,
    ) -> EngineResult<()> {
        let policy = if self.modifiers_enabled {
            self.resize_policy
                .with_modifiers(modifiers.shift, modifiers.alt)
        } else {
            self.resize_policy
        };
        self.canvas_mut(canvas)?
            .pointer_down_on_handle(tile, handle, policy)?;
        self.clear_selection_except(canvas);
        Ok(())
    }

    pub fn pointer_down_on_empty(&mut self, canvas: CanvasId) -> EngineResult<()> {
        self.canvas_mut(canvas)?.pointer_down_on_empty();
        Ok(())
    }

    /// Window-level pointer move, routed to every canvas listening for it.
    pub fn pointer_move(&mut self, client: Point) {
        for owner in self.registry.owners(ListenerKind::PointerMove) {
            if let Ok(canvas) = self.canvas_mut(owner) {
                canvas.pointer_move(client);
            }
        }
    }

    /// Window-level pointer release. The release position is applied before
    /// the gesture ends.
    pub fn pointer_up(&mut self, client: Point) {
        for owner in self.registry.owners(ListenerKind::PointerUp) {
            if let Ok(canvas) = self.canvas_mut(owner) {
                canvas.pointer_move(client);
                canvas.pointer_up();
            }
        }
    }

    /// Apply one coalesced pointer sample per gesture and place every drop
    /// whose natural size has resolved.
    pub fn tick(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        for canvas in &mut self.canvases {
            if canvas.flush_frame() {
                report.geometry_writes += 1;
            }
        }
        let done = self.resolver.drain();
        report.placed = self.complete(done);
        report
    }

    /// Block until all in-flight drops resolve (or `timeout`), then place them.
    pub fn settle_drops(&mut self, timeout: Duration) -> Vec<TileId> {
        let done = self.resolver.wait_all(timeout);
        self.complete(done)
    }

    fn complete(&mut self, done: Vec<ResolvedDrop>) -> Vec<TileId> {
        let mut placed = Vec::with_capacity(done.len());
        for resolved in done {
            let canvas = resolved.pending.canvas;
            match self.canvas_mut(canvas) {
                Ok(target) => {
                    placed.push(target.complete_drop(resolved));
                    self.clear_selection_except(canvas);
                }
                Err(err) => {
                    tracing::debug!(ticket = %resolved.pending.ticket, error = %err, "drop outlived its canvas");
                }
            }
        }
        placed
    }

    /// Delete key: remove the selected tile wherever it is.
    pub fn delete_selected(&mut self) -> Option<(CanvasId, TileId)> {
        self.canvases
            .iter_mut()
            .find_map(|c| c.delete_selected().map(|id| (c.id(), id)))
    }

    pub fn remove_tile(&mut self, canvas: CanvasId, tile: TileId) -> EngineResult<bool> {
        Ok(self.canvas_mut(canvas)?.remove_tile(tile))
    }

    pub fn clear_selection(&mut self) {
        for canvas in &mut self.canvases {
            canvas.clear_selection();
        }
    }

    /// The selected tile, if any canvas has one.
    pub fn selection(&self) -> Option<(CanvasId, TileId)> {
        self.canvases
            .iter()
            .find_map(|c| c.selected().map(|id| (c.id(), id)))
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn clear_selection_except(&mut self, keep: CanvasId) {
        for canvas in self.canvases.iter_mut().filter(|c| c.id() != keep) {
            canvas.clear_selection();
        }
    }
}
