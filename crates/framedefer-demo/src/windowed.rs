use anyhow::Result;
use std::rc::Rc;

use framedefer::core::{App, AppControl, FrameCtx};
use framedefer::window::{Runtime, RuntimeConfig};
use framedefer::{DeferConfig, DeferCounter, HostEnvironment, HostScheduler};

use crate::reveal::Reveal;

struct RevealApp {
    config: DeferConfig,
    reveal: Reveal,
    counter: Option<DeferCounter>,
}

impl App for RevealApp {
    fn on_start(&mut self, host: &HostEnvironment) {
        let scheduler = Rc::new(HostScheduler::from_env(host, &self.config));
        log::info!("frame source: {}", scheduler.source());
        self.counter = Some(DeferCounter::from_config(scheduler, &self.config));
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(counter) = &self.counter else {
            return AppControl::Exit;
        };

        log::trace!(
            "frame {}: {} scheduled callbacks, count {}",
            ctx.time.frame_index,
            ctx.callbacks_run,
            counter.count()
        );

        for row in self.reveal.advance(counter) {
            println!("  frame {:>3}  {row}", ctx.time.frame_index);
        }

        ctx.window.set_title(&format!(
            "framedefer: {}/{} revealed",
            self.reveal.shown(),
            self.reveal.len()
        ));

        if self.reveal.is_complete() || counter.is_finished() {
            if let Some(fps) = ctx.time.fps {
                log::info!("display ran at ~{fps:.1} fps");
            }
            return AppControl::Exit;
        }
        AppControl::Continue
    }
}

/// Runs the reveal in a window, one step per presented frame.
pub fn run(config: DeferConfig, reveal: Reveal) -> Result<()> {
    let app = RevealApp {
        config,
        reveal,
        counter: None,
    };
    Runtime::run(
        RuntimeConfig {
            title: "framedefer".to_string(),
            ..RuntimeConfig::default()
        },
        app,
    )
}
