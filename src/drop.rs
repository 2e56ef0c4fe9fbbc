//! Drop handling: reserve a slot on the target canvas, resolve the source's
//! natural size on a worker thread, then place the tile on completion.
//!
//! Each worker owns its [`PendingDrop`] and sends it back inside a
//! [`ResolvedDrop`]; nothing is shared between concurrent resolutions.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::canvas::CanvasId;
use crate::constants::{INITIAL_MAX_H, INITIAL_MAX_W, MIN_H, MIN_W};
use crate::error::EngineError;
use crate::geometry::{CanvasRect, Point, Size};
use crate::probe::{NaturalSizeProbe, resolve_natural_size};

/// Drag payload supplied by the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub src: String,
    pub name: String,
}

impl SourceDescriptor {
    pub fn new(src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            name: name.into(),
        }
    }

    /// Parse `name=path`, or a bare `path` named after its file stem.
    pub fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim();
        if arg.is_empty() {
            return None;
        }
        if let Some((name, src)) = arg.split_once('=') {
            let (name, src) = (name.trim(), src.trim());
            if name.is_empty() || src.is_empty() {
                return None;
            }
            return Some(Self::new(src, name));
        }
        let stem = std::path::Path::new(arg)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(arg);
        Some(Self::new(arg, stem))
    }
}

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropTicket(u64);

impl DropTicket {
    pub fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DropTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drop-{}", self.0)
    }
}

/// A drop that holds a capacity reservation but has no natural size yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDrop {
    pub ticket: DropTicket,
    pub canvas: CanvasId,
    pub descriptor: SourceDescriptor,
    pub local_point: Point,
    pub rect_at_drop: CanvasRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDrop {
    pub pending: PendingDrop,
    pub nat: Size,
    /// Set when the probe failed and `nat` is the fallback size.
    pub failure: Option<EngineError>,
}

/// Initial display size of a freshly dropped tile.
///
/// The natural aspect is fitted into `min(160, nat.w) x min(100, nat.h)`.
/// A canvas smaller than that box scales both sides by one factor. The height
/// drives the rounding (`w = round(h * aspect)`) and steps down a pixel while
/// the rounded box still overhangs the canvas; the minimum tile size is
/// applied last.
pub fn initial_size(nat: Size, rect: CanvasRect) -> Size {
    let nat = Size::new(nat.w.max(1.0), nat.h.max(1.0));
    let aspect = nat.aspect();
    let box_w = INITIAL_MAX_W.min(nat.w);
    let box_h = INITIAL_MAX_H.min(nat.h);
    let (mut w, mut h) = (box_w, box_w / aspect);
    if h > box_h {
        h = box_h;
        w = h * aspect;
    }
    let scale = if rect.is_empty() {
        1.0
    } else {
        1.0f64.min(rect.width / w).min(rect.height / h)
    };
    let mut h = (h * scale).round().max(1.0);
    let mut w = (h * aspect).round();
    if !rect.is_empty() {
        let (max_w, max_h) = (rect.width.floor(), rect.height.floor());
        while h > 1.0 && (w > max_w || h > max_h) {
            h -= 1.0;
            w = (h * aspect).round();
        }
    }
    Size::new(w.max(MIN_W), h.max(MIN_H))
}

/// Resolves natural sizes off the UI thread.
pub struct DropResolver {
    probe: Arc<dyn NaturalSizeProbe>,
    tx: Sender<ResolvedDrop>,
    rx: Receiver<ResolvedDrop>,
    in_flight: usize,
}

impl fmt::Debug for DropResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropResolver")
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl DropResolver {
    pub fn new(probe: Arc<dyn NaturalSizeProbe>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn submit(&mut self, pending: PendingDrop) {
        self.in_flight += 1;
        let probe = Arc::clone(&self.probe);
        let tx = self.tx.clone();
        let ticket = pending.ticket;
        let fallback = pending.clone();
        let spawned = thread::Builder::new()
            .name(format!("tile-wall-{ticket}"))
            .spawn(move || resolve_and_send(probe.as_ref(), pending, &tx));
        if let Err(err) = spawned {
            tracing::warn!(%ticket, error = %err, "resolver thread unavailable, resolving inline");
            resolve_and_send(self.probe.as_ref(), fallback, &self.tx);
        }
    }

    /// Every resolution that has finished so far, without blocking.
    pub fn drain(&mut self) -> Vec<ResolvedDrop> {
        let done: Vec<ResolvedDrop> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Block until every submitted drop has resolved or `timeout` passes.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<ResolvedDrop> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(resolved) => {
                    self.in_flight -= 1;
                    done.push(resolved);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}

fn resolve_and_send(probe: &dyn NaturalSizeProbe, pending: PendingDrop, tx: &Sender<ResolvedDrop>) {
    let (nat, failure) = resolve_natural_size(probe, &pending.descriptor.src);
    // The receiver only disappears when the workspace is gone.
    let _ = tx.send(ResolvedDrop {
        pending,
        nat,
        failure,
    });
}
