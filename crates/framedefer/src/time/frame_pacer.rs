use std::time::{Duration, Instant};

use crate::schedule::FALLBACK_FRAME_INTERVAL;

/// Paces redraws to a display refresh interval.
///
/// Without a presenting swapchain nothing blocks between redraws, so the
/// runtime asks the pacer when the next frame is allowed and sleeps until then.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    /// Interval from a monitor refresh rate in millihertz; unknown or zero
    /// rates use the 60 Hz fallback.
    pub fn from_refresh_millihertz(millihertz: Option<u32>) -> Self {
        let interval = match millihertz {
            Some(mhz) if mhz > 0 => Duration::from_secs_f64(1000.0 / f64::from(mhz)),
            _ => FALLBACK_FRAME_INTERVAL,
        };
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Earliest instant the next frame may start; `None` before the first frame.
    pub fn next_frame_at(&self) -> Option<Instant> {
        self.last_frame
            .map(|last| last.checked_add(self.interval).unwrap_or(last))
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_frame_at().is_none_or(|at| now >= at)
    }

    pub fn mark_frame(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(FALLBACK_FRAME_INTERVAL)
    }
}
