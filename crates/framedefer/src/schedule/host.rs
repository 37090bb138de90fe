use std::fmt;
use std::rc::Rc;

use crate::config::DeferConfig;

use super::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler, TimerScheduler};

/// Which frame-pacing facility a scheduler runs on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FrameSource {
    /// The host's own frame boundary.
    Native,
    /// Fixed-interval timer approximating 60 Hz.
    FallbackTimer,
}

impl FrameSource {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameSource::Native => "native",
            FrameSource::FallbackTimer => "fallback-timer",
        }
    }
}

impl fmt::Display for FrameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host offers for frame pacing.
///
/// Built once by whoever owns the event loop and passed down explicitly. A
/// windowed runtime hands out its [`FrameQueue`]; a headless host uses
/// [`HostEnvironment::headless`].
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    native_frames: Option<Rc<FrameQueue>>,
}

impl HostEnvironment {
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn with_native_frames(frames: Rc<FrameQueue>) -> Self {
        Self {
            native_frames: Some(frames),
        }
    }

    pub fn native_frames(&self) -> Option<&Rc<FrameQueue>> {
        self.native_frames.as_ref()
    }

    pub fn frame_source(&self) -> FrameSource {
        match self.native_frames {
            Some(_) => FrameSource::Native,
            None => FrameSource::FallbackTimer,
        }
    }
}

/// Scheduler resolved once from a [`HostEnvironment`].
///
/// The native queue is used as-is; without one, a [`TimerScheduler`] with the
/// configured interval is created and the host is expected to poll it.
pub enum HostScheduler {
    Native(Rc<FrameQueue>),
    Timer(TimerScheduler),
}

impl HostScheduler {
    pub fn from_env(env: &HostEnvironment, config: &DeferConfig) -> Self {
        let scheduler = match env.native_frames() {
            Some(frames) => HostScheduler::Native(Rc::clone(frames)),
            None => HostScheduler::Timer(TimerScheduler::with_interval(config.frame_interval())),
        };

        match &scheduler {
            HostScheduler::Native(_) => log::debug!("frame scheduler: native frame queue"),
            HostScheduler::Timer(t) => {
                log::debug!("frame scheduler: fallback timer every {:?}", t.interval())
            }
        }

        scheduler
    }

    pub fn source(&self) -> FrameSource {
        match self {
            HostScheduler::Native(_) => FrameSource::Native,
            HostScheduler::Timer(_) => FrameSource::FallbackTimer,
        }
    }

    /// The fallback timer, for hosts that must poll it.
    pub fn as_timer(&self) -> Option<&TimerScheduler> {
        match self {
            HostScheduler::Timer(t) => Some(t),
            HostScheduler::Native(_) => None,
        }
    }

    pub fn as_native(&self) -> Option<&Rc<FrameQueue>> {
        match self {
            HostScheduler::Native(q) => Some(q),
            HostScheduler::Timer(_) => None,
        }
    }
}

impl FrameScheduler for HostScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        match self {
            HostScheduler::Native(q) => q.schedule(callback),
            HostScheduler::Timer(t) => t.schedule(callback),
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        match self {
            HostScheduler::Native(q) => q.cancel(handle),
            HostScheduler::Timer(t) => t.cancel(handle),
        }
    }
}

impl fmt::Debug for HostScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostScheduler::Native(q) => f.debug_tuple("Native").field(q).finish(),
            HostScheduler::Timer(t) => f.debug_tuple("Timer").field(t).finish(),
        }
    }
}
