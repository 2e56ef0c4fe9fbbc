/// Per-frame pointer sample buffer.
///
/// Uses a "latest wins" strategy: pushing while a sample is pending replaces
/// it and counts the earlier one as coalesced. The frame tick takes at most
/// one sample.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    coalesced: u64,
    applied: u64,
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            coalesced: 0,
            applied: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.pending.replace(sample).is_some() {
            self.coalesced += 1;
        }
    }

    pub fn take(&mut self) -> Option<T> {
        let sample = self.pending.take();
        if sample.is_some() {
            self.applied += 1;
        }
        sample
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending sample without applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Samples discarded because a later one arrived in the same frame.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Samples handed out by [`take`](Self::take).
    pub fn applied(&self) -> u64 {
        self.applied
    }
}
