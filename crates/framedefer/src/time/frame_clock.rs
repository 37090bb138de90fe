use std::time::{Duration, Instant};

/// Smoothing factor for the frame interval moving average.
const INTERVAL_SMOOTHING: f64 = 0.1;

/// Timing snapshot for one presented frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous frame, clamped.
    pub dt: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Zero-based index of this frame.
    pub frame_index: u64,

    /// Smoothed frames-per-second estimate; `None` until two frames were seen.
    pub fps: Option<f64>,
}

/// Per-loop frame clock.
///
/// `dt` is clamped to `max_dt` so a stall (debugger, minimised window) does not
/// produce one enormous step, and the stall is kept out of the fps estimate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    max_dt: Duration,
    avg_interval: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(Duration::from_millis(250))
    }

    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self {
            last: None,
            frame_index: 0,
            max_dt,
            avg_interval: None,
        }
    }

    /// Forgets the previous timestamp; the next tick reports `dt == 0`.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        let dt = raw.min(self.max_dt);

        if self.last.is_some() && raw <= self.max_dt && !raw.is_zero() {
            let secs = raw.as_secs_f64();
            self.avg_interval = Some(match self.avg_interval {
                Some(avg) => avg + (secs - avg) * INTERVAL_SMOOTHING,
                None => secs,
            });
        }
        self.last = Some(now);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
            fps: self.avg_interval.map(|avg| 1.0 / avg),
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
