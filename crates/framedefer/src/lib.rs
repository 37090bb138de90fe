//! Framedefer crate.
//!
//! Stages work across rendering frames. A [`DeferCounter`] advances by one on
//! every frame up to a ceiling and answers threshold queries, so UI code can
//! reveal element `i` only once `has_reached(i)` holds instead of building
//! everything in the first frame.
//!
//! Frames are delivered by a [`FrameScheduler`]: either the host's native frame
//! boundary ([`FrameQueue`], driven by the winit runtime in [`window`]) or a
//! fixed-interval fallback timer ([`TimerScheduler`]).

pub mod config;
pub mod core;
pub mod defer;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod time;
pub mod window;

pub use config::DeferConfig;
pub use defer::{DEFAULT_MAX_COUNT, DeferCounter, DeferScope, use_defer};
pub use error::{DeferError, DeferResult};
pub use schedule::{
    FALLBACK_FRAME_INTERVAL, FrameCallback, FrameHandle, FrameQueue, FrameScheduler, FrameSource,
    HostEnvironment, HostScheduler, TimerScheduler,
};
