use anyhow::{Context, Result};
use std::rc::Rc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::schedule::{FrameQueue, HostEnvironment};
use crate::time::{FrameClock, FramePacer};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "framedefer".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
        }
    }
}

/// Entry point for the windowed host.
///
/// Owns a [`FrameQueue`] and exposes it to the app as the native frame
/// facility. Every redraw runs one queue frame, then `App::on_frame`.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        log::debug!("runtime exited after {} frames", state.frames.frames_run());
        Ok(())
    }
}

struct WindowEntry {
    window: Window,
    clock: FrameClock,
    pacer: FramePacer,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,

    frames: Rc<FrameQueue>,
    host: HostEnvironment,

    window: Option<WindowEntry>,
    started: bool,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        let frames = Rc::new(FrameQueue::new());
        let host = HostEnvironment::with_native_frames(Rc::clone(&frames));
        Self {
            config,
            app,
            frames,
            host,
            window: None,
            started: false,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let refresh = window
            .current_monitor()
            .and_then(|m| m.refresh_rate_millihertz());
        let pacer = FramePacer::from_refresh_millihertz(refresh);
        log::debug!("pacing redraws every {:?}", pacer.interval());

        self.window = Some(WindowEntry {
            window,
            clock: FrameClock::default(),
            pacer,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        // Redraws requested outside the pacer (resize, expose) are not frames.
        let now = Instant::now();
        if !entry.pacer.is_due(now) {
            return;
        }
        entry.pacer.mark_frame(now);

        let time = entry.clock.tick_at(now);
        let callbacks_run = self.frames.run_frame();

        let control = {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: &entry.window,
                },
                time,
                host: &self.host,
                callbacks_run,
            };
            self.app.on_frame(&mut ctx)
        };

        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.request_exit(event_loop);
            return;
        }

        if !self.started {
            self.started = true;
            self.app.on_start(&self.host);
        }

        if let Some(entry) = &self.window {
            entry.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = &self.window else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        // Continuous redraw, one frame per refresh interval.
        match entry.pacer.next_frame_at() {
            Some(at) if Instant::now() < at => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(at));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Wait);
                entry.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = &self.window {
                    entry.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }
}
