//! Contracts between the window runtime and the application.
//!
//! The runtime owns the event loop and the native frame queue; the application
//! sees one [`FrameCtx`] per presented frame and never touches winit directly.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
