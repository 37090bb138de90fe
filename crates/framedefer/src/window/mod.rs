//! Windowed host.
//!
//! Owns the `winit` EventLoop and Window and turns each redraw into a native
//! frame boundary for the scheduler.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
