use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::DeferConfig;
use crate::error::{DeferError, DeferResult};
use crate::schedule::{FrameHandle, FrameScheduler};

/// Ceiling used when the caller does not pick one.
pub const DEFAULT_MAX_COUNT: u32 = 100;

#[derive(Debug)]
struct CounterState {
    count: u32,
    max_count: u32,
    pending: Option<FrameHandle>,
    disposed: bool,
}

/// Frame counter that advances once per frame up to a ceiling.
///
/// Construction already applies the first increment, so a fresh counter
/// reports `has_reached(1)` before any frame has passed. After that, every
/// frame delivered by the scheduler adds one until `count == max_count`, at
/// which point the counter stops scheduling itself.
///
/// A `max_count` of zero is tolerated: the first increment already meets the
/// ceiling, so the count stays at 1. Use [`DeferCounter::try_new`] to reject
/// it instead.
///
/// Dropping the counter disposes it.
pub struct DeferCounter {
    state: Rc<RefCell<CounterState>>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl DeferCounter {
    pub fn new(scheduler: Rc<dyn FrameScheduler>, max_count: u32) -> Self {
        let state = Rc::new(RefCell::new(CounterState {
            count: 0,
            max_count,
            pending: None,
            disposed: false,
        }));

        log::trace!("defer counter started (max_count = {max_count})");
        tick(&state, &scheduler);

        Self { state, scheduler }
    }

    pub fn with_default_max(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self::new(scheduler, DEFAULT_MAX_COUNT)
    }

    pub fn from_config(scheduler: Rc<dyn FrameScheduler>, config: &DeferConfig) -> Self {
        Self::new(scheduler, config.max_count)
    }

    /// Like [`new`](Self::new), but rejects a zero ceiling.
    pub fn try_new(scheduler: Rc<dyn FrameScheduler>, max_count: u32) -> DeferResult<Self> {
        if max_count == 0 {
            return Err(DeferError::InvalidMaxCount(max_count));
        }
        Ok(Self::new(scheduler, max_count))
    }

    /// Whether at least `n` frames have been counted.
    ///
    /// Negative thresholds are always reached. Still answers after disposal,
    /// against the frozen count.
    pub fn has_reached(&self, n: i64) -> bool {
        i64::from(self.state.borrow().count) >= n
    }

    pub fn count(&self) -> u32 {
        self.state.borrow().count
    }

    pub fn max_count(&self) -> u32 {
        self.state.borrow().max_count
    }

    /// True once the ceiling is met and no further frames will be counted.
    pub fn is_finished(&self) -> bool {
        let s = self.state.borrow();
        s.count >= s.max_count
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// Stops the counter. Idempotent.
    pub fn dispose(&self) {
        let pending = {
            let mut s = self.state.borrow_mut();
            if s.disposed {
                return;
            }
            s.disposed = true;
            s.pending.take()
        };

        if let Some(handle) = pending {
            self.scheduler.cancel(handle);
        }

        log::trace!("defer counter disposed at count {}", self.count());
    }
}

impl Drop for DeferCounter {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for DeferCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferCounter")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// One frame: count, then re-arm while below the ceiling.
fn tick(state: &Rc<RefCell<CounterState>>, scheduler: &Rc<dyn FrameScheduler>) {
    let armed_at = {
        let mut s = state.borrow_mut();

        // Cancellation may lose the race with delivery; this is the guard that holds.
        if s.disposed {
            return;
        }

        s.count = s.count.saturating_add(1);

        if s.count >= s.max_count {
            s.pending = None;
            log::trace!("defer counter reached ceiling {}", s.max_count);
            return;
        }
        s.count
    };

    // No borrow is held here: a misbehaving scheduler may run the tick inline.
    let next_state: Weak<RefCell<CounterState>> = Rc::downgrade(state);
    let next_scheduler: Weak<dyn FrameScheduler> = Rc::downgrade(scheduler);
    let handle = scheduler.schedule(Box::new(move || {
        if let (Some(state), Some(scheduler)) = (next_state.upgrade(), next_scheduler.upgrade()) {
            tick(&state, &scheduler);
        }
    }));

    let mut s = state.borrow_mut();
    if s.disposed {
        drop(s);
        scheduler.cancel(handle);
    } else if s.count == armed_at {
        s.pending = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::testing::RecordingScheduler;
    use crate::schedule::{FrameCallback, FrameQueue, HostEnvironment, HostScheduler};
    use crate::schedule::handle::HandleAllocator;
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    fn recording() -> Rc<RecordingScheduler> {
        Rc::new(RecordingScheduler::default())
    }

    fn counter(sched: &Rc<RecordingScheduler>, max: u32) -> DeferCounter {
        DeferCounter::new(sched.clone(), max)
    }

    // ── pre-advance ───────────────────────────────────────────────────────

    #[test]
    fn fresh_counter_has_already_reached_one() {
        let sched = recording();
        let c = counter(&sched, 5);
        assert!(c.has_reached(0));
        assert!(c.has_reached(1));
        assert!(!c.has_reached(2));
        assert_eq!(c.count(), 1);
        assert_eq!(sched.schedule_calls(), 1);
    }

    #[test]
    fn default_ceiling_is_one_hundred() {
        let sched = recording();
        let c = DeferCounter::with_default_max(sched.clone());
        assert_eq!(c.max_count(), DEFAULT_MAX_COUNT);
        assert_eq!(DEFAULT_MAX_COUNT, 100);
    }

    // ── ticking ───────────────────────────────────────────────────────────

    #[test]
    fn each_tick_adds_exactly_one() {
        let sched = recording();
        let c = counter(&sched, 50);
        let mut seen = vec![c.count()];
        for _ in 0..10 {
            assert!(sched.fire_next());
            seen.push(c.count());
        }
        let expected: Vec<u32> = (1..=11).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn at_most_one_tick_pending() {
        let sched = recording();
        let _c = counter(&sched, 20);
        for _ in 0..5 {
            assert_eq!(sched.queued(), 1);
            sched.fire_next();
        }
        assert_eq!(sched.queued(), 1);
    }

    #[test]
    fn three_ticks_from_ten() {
        let sched = recording();
        let c = counter(&sched, 10);
        assert_eq!(sched.fire(3), 3);
        assert!(c.has_reached(3));
        assert!(c.has_reached(4));
        assert!(!c.has_reached(5));
    }

    // ── ceiling ───────────────────────────────────────────────────────────

    #[test]
    fn ceiling_of_five_stops_scheduling() {
        let sched = recording();
        let c = counter(&sched, 5);
        assert_eq!(sched.fire(4), 4);

        assert!(c.has_reached(5));
        assert!(!c.has_reached(6));
        assert!(c.is_finished());

        // Seed + three re-arms; the tick that reached 5 did not schedule.
        assert_eq!(sched.schedule_calls(), 4);
        assert!(!sched.fire_next());
        assert_eq!(sched.schedule_calls(), 4);
        assert_eq!(c.count(), 5);
    }

    #[test]
    fn default_ceiling_after_many_ticks() {
        let sched = recording();
        let c = DeferCounter::with_default_max(sched.clone());
        sched.fire(101);
        assert!(c.has_reached(100));
        assert!(!c.has_reached(101));
        assert_eq!(c.count(), 100);
    }

    #[test]
    fn count_never_exceeds_ceiling() {
        let sched = recording();
        let c = counter(&sched, 7);
        for _ in 0..20 {
            sched.fire_next();
            assert!(c.count() <= 7);
        }
        assert_eq!(c.count(), 7);
    }

    #[test]
    fn ceiling_of_one_never_schedules() {
        let sched = recording();
        let c = counter(&sched, 1);
        assert_eq!(c.count(), 1);
        assert!(c.is_finished());
        assert_eq!(sched.schedule_calls(), 0);
    }

    #[test]
    fn zero_ceiling_is_tolerated_and_frozen_at_one() {
        let sched = recording();
        let c = counter(&sched, 0);
        assert_eq!(c.count(), 1);
        assert!(c.has_reached(1));
        assert!(!c.has_reached(2));
        assert_eq!(sched.schedule_calls(), 0);
    }

    #[test]
    fn try_new_rejects_zero_ceiling() {
        let sched = recording();
        let err = DeferCounter::try_new(sched.clone(), 0).unwrap_err();
        assert!(matches!(err, DeferError::InvalidMaxCount(0)));
        assert_eq!(sched.schedule_calls(), 0);

        let ok = DeferCounter::try_new(sched.clone(), 3).unwrap();
        assert_eq!(ok.count(), 1);
    }

    #[test]
    fn from_config_uses_configured_ceiling() {
        let sched = recording();
        let c = DeferCounter::from_config(sched.clone(), &DeferConfig::default().with_max_count(3));
        assert_eq!(c.max_count(), 3);
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn negative_threshold_is_always_reached() {
        let sched = recording();
        let c = counter(&sched, 10);
        assert!(c.has_reached(-1));
        assert!(c.has_reached(i64::MIN));
        c.dispose();
        assert!(c.has_reached(-1));
    }

    // ── dispose ───────────────────────────────────────────────────────────

    #[test]
    fn dispose_before_first_tick_freezes_at_one() {
        let sched = recording();
        let c = counter(&sched, 50);
        c.dispose();

        assert_eq!(sched.cancelled().len(), 1);
        // The double still delivers the cancelled tick; it must be ignored.
        sched.fire(10);
        assert_eq!(c.count(), 1);
        assert!(!c.has_reached(2));
        assert_eq!(sched.schedule_calls(), 1);
    }

    #[test]
    fn dispose_mid_run_freezes_count() {
        let sched = recording();
        let c = counter(&sched, 50);
        sched.fire(4);
        assert_eq!(c.count(), 5);

        c.dispose();
        sched.fire(10);
        assert_eq!(c.count(), 5);
        assert!(c.is_disposed());
    }

    #[test]
    fn dispose_twice_is_noop() {
        let sched = recording();
        let c = counter(&sched, 50);
        c.dispose();
        c.dispose();
        assert_eq!(sched.cancelled().len(), 1);
    }

    #[test]
    fn dispose_after_ceiling_cancels_nothing() {
        let sched = recording();
        let c = counter(&sched, 2);
        sched.fire(1);
        assert!(c.is_finished());
        c.dispose();
        assert!(sched.cancelled().is_empty());
    }

    #[test]
    fn drop_disposes() {
        let sched = recording();
        let c = counter(&sched, 50);
        drop(c);
        assert_eq!(sched.cancelled().len(), 1);
        // Late delivery after drop is harmless.
        assert!(sched.fire_next());
        assert_eq!(sched.schedule_calls(), 1);
    }

    // ── independence ──────────────────────────────────────────────────────

    #[test]
    fn counters_on_separate_schedulers_are_independent() {
        let sched_a = recording();
        let sched_b = recording();
        let a = counter(&sched_a, 50);
        let b = counter(&sched_b, 200);

        sched_a.fire(10);
        assert_eq!(a.count(), 11);
        assert_eq!(b.count(), 1);

        sched_b.fire(3);
        assert_eq!(a.count(), 11);
        assert_eq!(b.count(), 4);
    }

    #[test]
    fn counters_sharing_a_frame_queue_tick_together() {
        let frames = Rc::new(FrameQueue::new());
        let a = DeferCounter::new(frames.clone(), 3);
        let b = DeferCounter::new(frames.clone(), 5);

        for _ in 0..10 {
            frames.run_frame();
        }
        assert_eq!(a.count(), 3);
        assert_eq!(b.count(), 5);
        assert!(frames.is_idle());
    }

    #[test]
    fn disposing_one_counter_leaves_the_other_running() {
        let frames = Rc::new(FrameQueue::new());
        let a = DeferCounter::new(frames.clone(), 10);
        let b = DeferCounter::new(frames.clone(), 10);

        frames.run_frame();
        a.dispose();
        frames.run_frame();
        frames.run_frame();

        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 4);
    }

    // ── fallback timer ────────────────────────────────────────────────────

    fn headless_timer(interval_ms: f64) -> Rc<HostScheduler> {
        let config = DeferConfig::default().with_frame_interval_ms(interval_ms);
        Rc::new(HostScheduler::from_env(&HostEnvironment::headless(), &config))
    }

    #[test]
    fn fallback_timer_drives_counter_to_ceiling() {
        let sched = headless_timer(1.0);
        let timer = sched.as_timer().unwrap();
        let c = DeferCounter::new(sched.clone(), 5);
        assert_eq!(c.count(), 1);
        assert_eq!(timer.pending(), 1);

        let far = Instant::now() + Duration::from_secs(3600);
        for _ in 0..10 {
            timer.poll_at(far);
        }
        assert_eq!(c.count(), 5);
        assert!(c.is_finished());
        assert!(timer.is_idle());
    }

    #[test]
    fn fallback_timer_dispose_freezes_count() {
        let sched = headless_timer(1.0);
        let timer = sched.as_timer().unwrap();
        let c = DeferCounter::new(sched.clone(), 5);

        let far = Instant::now() + Duration::from_secs(3600);
        timer.poll_at(far);
        timer.poll_at(far);
        assert_eq!(c.count(), 3);

        c.dispose();
        assert!(timer.is_idle());
        for _ in 0..5 {
            timer.poll_at(far);
        }
        assert_eq!(c.count(), 3);
    }

    // ── misbehaving schedulers ────────────────────────────────────────────

    /// Runs every callback before `schedule` returns.
    #[derive(Default)]
    struct InlineScheduler {
        calls: Cell<u64>,
        cancelled: Cell<u64>,
    }

    impl FrameScheduler for InlineScheduler {
        fn schedule(&self, callback: FrameCallback) -> FrameHandle {
            self.calls.set(self.calls.get() + 1);
            let handle = HandleAllocator::default().next();
            callback();
            handle
        }

        fn cancel(&self, _handle: FrameHandle) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }

    #[test]
    fn inline_scheduler_runs_to_ceiling_without_panicking() {
        let sched = Rc::new(InlineScheduler::default());
        let c = DeferCounter::new(sched.clone(), 5);
        assert_eq!(c.count(), 5);
        assert!(c.is_finished());
        assert_eq!(sched.calls.get(), 4);

        // Nothing is pending, so disposal has nothing to cancel.
        c.dispose();
        assert_eq!(sched.cancelled.get(), 0);
    }
}
