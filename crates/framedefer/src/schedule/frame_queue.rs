use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use super::handle::{FrameCallback, FrameHandle, HandleAllocator};
use super::FrameScheduler;

/// Native frame boundary driven by the host.
///
/// Callbacks scheduled before a frame starts run during that frame, in
/// scheduling order. Callbacks scheduled while a frame is running wait for the
/// next one, which is what lets a callback re-arm itself once per frame.
#[derive(Default)]
pub struct FrameQueue {
    handles: HandleAllocator,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    running: RefCell<VecDeque<(FrameHandle, FrameCallback)>>,
    frames_run: Cell<u64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame. Call exactly once per presented frame.
    ///
    /// Returns the number of callbacks invoked. Must not be called from inside
    /// one of its own callbacks.
    pub fn run_frame(&self) -> usize {
        {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            self.running.borrow_mut().extend(batch);
        }

        let mut fired = 0;
        loop {
            // No borrow is held while a callback runs; callbacks re-enter `schedule`.
            let next = self.running.borrow_mut().pop_front();
            let Some((_, callback)) = next else {
                break;
            };
            callback();
            fired += 1;
        }

        self.frames_run.set(self.frames_run.get().wrapping_add(1));
        fired
    }

    /// Callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Number of frames run so far.
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.handles.next();
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
        self.running.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .field("frames_run", &self.frames_run())
            .finish()
    }
}
