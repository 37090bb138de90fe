use std::rc::Rc;

use crate::schedule::FrameScheduler;

use super::DeferCounter;

/// Starts a counter and returns only its threshold query.
///
/// The closure owns the counter; dropping the closure stops it.
pub fn use_defer(scheduler: Rc<dyn FrameScheduler>, max_count: u32) -> impl Fn(i64) -> bool {
    let counter = DeferCounter::new(scheduler, max_count);
    move |n| counter.has_reached(n)
}

/// Owner of the counters created for one view.
///
/// Tearing the scope down (explicitly or by dropping it) disposes every counter
/// it handed out, even if callers still hold their `Rc`s.
pub struct DeferScope {
    scheduler: Rc<dyn FrameScheduler>,
    counters: Vec<Rc<DeferCounter>>,
    torn_down: bool,
}

impl DeferScope {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            counters: Vec::new(),
            torn_down: false,
        }
    }

    /// Starts a counter owned by this scope.
    ///
    /// After teardown the counter is disposed immediately and stays at 1.
    /// Counters that already stopped on their own are released here.
    pub fn counter(&mut self, max_count: u32) -> Rc<DeferCounter> {
        let counter = Rc::new(DeferCounter::new(Rc::clone(&self.scheduler), max_count));
        if self.torn_down {
            counter.dispose();
        } else {
            self.counters.retain(|c| !c.is_finished() && !c.is_disposed());
            self.counters.push(Rc::clone(&counter));
        }
        counter
    }

    /// Counters still held for teardown.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Disposes every owned counter. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let n = self.counters.len();
        for counter in self.counters.drain(..) {
            counter.dispose();
        }
        log::debug!("defer scope torn down ({n} counters)");
    }
}

impl Drop for DeferScope {
    fn drop(&mut self) {
        self.teardown();
    }
}
