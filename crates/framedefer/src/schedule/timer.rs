use std::cell::RefCell;
use std::fmt;
use std::time::{Duration, Instant};

use super::handle::{FrameCallback, FrameHandle, HandleAllocator};
use super::FrameScheduler;

/// Fallback frame interval, approximating a 60 Hz display (≈16.67 ms).
pub const FALLBACK_FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

struct TimerEntry {
    deadline: Instant,
    handle: FrameHandle,
    callback: FrameCallback,
}

/// Fixed-interval timer standing in for a native frame boundary.
///
/// `schedule` sets a deadline one interval from now. The host drives delivery
/// with [`poll`](Self::poll) from its own loop, or hands the thread over to
/// [`run_until_idle`](Self::run_until_idle) when it has nothing else to do.
pub struct TimerScheduler {
    interval: Duration,
    handles: HandleAllocator,
    entries: RefCell<Vec<TimerEntry>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::with_interval(FALLBACK_FRAME_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            handles: HandleAllocator::default(),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pending(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Earliest outstanding deadline, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.borrow().iter().map(|e| e.deadline).min()
    }

    /// Fires everything due as of now.
    pub fn poll(&self) -> usize {
        self.poll_at(Instant::now())
    }

    /// Fires every callback whose deadline is at or before `now`.
    ///
    /// Order is by deadline, then by scheduling order. Callbacks scheduled by
    /// the fired callbacks are left for a later poll.
    pub fn poll_at(&self, now: Instant) -> usize {
        let mut due: Vec<(Instant, FrameHandle)> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.deadline <= now)
            .map(|e| (e.deadline, e.handle))
            .collect();
        due.sort_unstable();

        let mut fired = 0;
        for (_, handle) in due {
            // Re-check: an earlier callback may have cancelled this one.
            let entry = {
                let mut entries = self.entries.borrow_mut();
                entries
                    .iter()
                    .position(|e| e.handle == handle)
                    .map(|idx| entries.remove(idx))
            };

            if let Some(entry) = entry {
                (entry.callback)();
                fired += 1;
            }
        }
        fired
    }

    /// Blocks the calling thread, sleeping between deadlines, until no
    /// callbacks remain. Returns the number of callbacks fired.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            fired += self.poll();
        }
        fired
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for TimerScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.handles.next();
        let deadline = Instant::now() + self.interval;
        self.entries.borrow_mut().push(TimerEntry {
            deadline,
            handle,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.entries.borrow_mut().retain(|e| e.handle != handle);
    }
}

impl fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("interval", &self.interval)
            .field("pending", &self.pending())
            .finish()
    }
}
