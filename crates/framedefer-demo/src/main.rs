mod headless;
mod reveal;
mod windowed;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use framedefer::DeferConfig;
use framedefer::logging::{init_logging, LoggingConfig};

use crate::reveal::Reveal;

/// Staggers the reveal of a list across animation frames.
#[derive(Debug, Parser)]
#[command(name = "framedefer-demo", version)]
struct Args {
    /// Run on the fallback timer instead of opening a window.
    #[arg(long)]
    headless: bool,

    /// Number of rows to reveal.
    #[arg(long, default_value_t = 8)]
    items: usize,

    /// Frames between consecutive rows.
    #[arg(long, default_value_t = 4)]
    stagger: u32,

    /// Counter ceiling; overrides the config file.
    #[arg(long)]
    max_count: Option<u32>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// `env_logger` filter, e.g. "framedefer=trace"; overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,

    /// TOML config; missing file means defaults.
    #[arg(long, default_value = "framedefer.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if args.verbose {
        logging = logging.with_default_level(LevelFilter::Debug);
    }
    if let Some(filter) = &args.log {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    let mut config = DeferConfig::load_or_default(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(max_count) = args.max_count {
        config.max_count = max_count;
    }

    let rows = (1..=args.items).map(|i| format!("row {i:02}")).collect();
    let reveal = Reveal::new(rows, args.stagger);

    if reveal.frames_needed() > i64::from(config.max_count) {
        log::warn!(
            "last row needs {} frames but the counter stops at {}",
            reveal.frames_needed(),
            config.max_count
        );
    }

    if args.headless {
        headless::run(&config, reveal)
    } else {
        windowed::run(config, reveal)
    }
}
