//! Frame timing.
//!
//! [`FrameClock`] is ticked once per presented frame by the window runtime and
//! yields a [`FrameTime`] snapshot, including a smoothed estimate of the
//! display's refresh rate so hosts can compare it with the 60 Hz fallback.
//! [`FramePacer`] spaces redraws one refresh interval apart.

mod frame_clock;
mod frame_pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_pacer::FramePacer;
