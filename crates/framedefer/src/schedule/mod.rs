//! Frame scheduling.
//!
//! A [`FrameScheduler`] runs a callback once at the next frame boundary and can
//! cancel it before it fires. Two implementations are provided:
//! - [`FrameQueue`]: the native facility. The host calls `run_frame()` once per
//!   presented frame (the winit runtime does this on every redraw).
//! - [`TimerScheduler`]: the fallback. Deadlines at a fixed interval that
//!   approximates a 60 Hz display, polled by the host loop.
//!
//! [`HostScheduler`] picks one of them from an explicit [`HostEnvironment`].
//!
//! Everything here is single-threaded; schedulers are shared as `Rc`.

mod frame_queue;
pub(crate) mod handle;
mod host;
mod timer;

pub use frame_queue::FrameQueue;
pub use handle::{FrameCallback, FrameHandle};
pub use host::{FrameSource, HostEnvironment, HostScheduler};
pub use timer::{FALLBACK_FRAME_INTERVAL, TimerScheduler};

/// "Invoke this once, timed to the next rendering frame."
pub trait FrameScheduler {
    /// Arranges for `callback` to run once at the next frame boundary.
    ///
    /// Implementations never invoke `callback` before returning.
    fn schedule(&self, callback: FrameCallback) -> FrameHandle;

    /// Prevents a scheduled callback from firing.
    ///
    /// Stale, already fired and already cancelled handles are ignored.
    fn cancel(&self, handle: FrameHandle);
}
