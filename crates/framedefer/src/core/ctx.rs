use winit::window::{Window, WindowId};

use crate::schedule::HostEnvironment;
use crate::time::FrameTime;

/// Per-window handle.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub time: FrameTime,
    pub host: &'a HostEnvironment,
    /// Scheduled callbacks that ran at the start of this frame.
    pub callbacks_run: usize,
}
