use anyhow::{Context, Result};
use std::rc::Rc;
use std::time::Instant;

use framedefer::{DeferConfig, DeferCounter, HostEnvironment, HostScheduler};

use crate::reveal::Reveal;

/// Runs the reveal on the fallback timer, without a window.
pub fn run(config: &DeferConfig, mut reveal: Reveal) -> Result<()> {
    let host = HostEnvironment::headless();
    let scheduler = Rc::new(HostScheduler::from_env(&host, config));
    let timer = scheduler
        .as_timer()
        .context("headless host did not select the fallback timer")?;

    let counter = DeferCounter::from_config(scheduler.clone(), config);
    let started = Instant::now();

    print_rows(counter.count(), reveal.advance(&counter));

    while !reveal.is_complete() {
        let Some(deadline) = timer.next_deadline() else {
            break;
        };
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        if timer.poll() > 0 {
            print_rows(counter.count(), reveal.advance(&counter));
        }
    }

    counter.dispose();
    log::info!(
        "revealed {}/{} rows in {} frames ({:.0?})",
        reveal.shown(),
        reveal.len(),
        counter.count(),
        started.elapsed()
    );
    Ok(())
}

fn print_rows(frame: u32, rows: &[String]) {
    for row in rows {
        println!("  frame {frame:>3}  {row}");
    }
}
