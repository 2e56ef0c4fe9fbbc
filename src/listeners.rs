//! Window-level pointer listeners held for the lifetime of a gesture.
//!
//! A gesture subscribes one pointer-move and one pointer-up listener through
//! [`ListenerRegistry::subscribe_gesture`]. The returned [`GestureListeners`]
//! unsubscribes both when dropped, so ending the gesture and tearing down the
//! canvas mid-gesture release them the same way.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::canvas::CanvasId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: u64,
    kind: ListenerKind,
    owner: CanvasId,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shared, single-threaded listener table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: ListenerKind, owner: CanvasId) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.push(Entry { id, kind, owner });
        tracing::trace!(listener = id, ?kind, canvas = %owner, "listener subscribed");
        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscribe_gesture(&self, owner: CanvasId) -> GestureListeners {
        GestureListeners {
            owner,
            _pointer_move: self.subscribe(ListenerKind::PointerMove, owner),
            _pointer_up: self.subscribe(ListenerKind::PointerUp, owner),
        }
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Owners of every live listener of `kind`, in subscription order.
    pub fn owners(&self, kind: ListenerKind) -> Vec<CanvasId> {
        let inner = self.inner.borrow();
        let mut owners: Vec<CanvasId> = Vec::new();
        for entry in inner.entries.iter().filter(|e| e.kind == kind) {
            if !owners.contains(&entry.owner) {
                owners.push(entry.owner);
            }
        }
        owners
    }

    /// Whether any canvas currently holds gesture listeners.
    pub fn gesture_in_progress(&self) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|e| e.kind == ListenerKind::PointerUp)
    }
}

/// One registered listener. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.borrow_mut();
        inner.entries.retain(|e| e.id != self.id);
        tracing::trace!(listener = self.id, "listener unsubscribed");
    }
}

/// The move/up listener pair of one gesture.
#[derive(Debug)]
pub struct GestureListeners {
    owner: CanvasId,
    _pointer_move: Subscription,
    _pointer_up: Subscription,
}

impl GestureListeners {
    pub fn owner(&self) -> CanvasId {
        self.owner
    }
}
