use std::cell::Cell;

/// Work scheduled for a future frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Opaque token returned by [`FrameScheduler::schedule`](super::FrameScheduler::schedule).
///
/// Only meaningful to the scheduler that issued it. Handles are never reused
/// within one scheduler, so a stale handle can't cancel newer work.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Monotonic handle source, one per scheduler.
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    last: Cell<u64>,
}

impl HandleAllocator {
    pub(crate) fn next(&self) -> FrameHandle {
        let id = self.last.get().wrapping_add(1);
        self.last.set(id);
        FrameHandle(id)
    }
}
