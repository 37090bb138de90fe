use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::schedule::HostEnvironment;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once, before the first frame, with the host's frame facilities.
    ///
    /// Counters created here first advance on the first presented frame.
    fn on_start(&mut self, host: &HostEnvironment) {
        let _ = host;
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per presented frame, after that frame's scheduled
    /// callbacks have run.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
