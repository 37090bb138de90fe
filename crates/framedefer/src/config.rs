use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::defer::DEFAULT_MAX_COUNT;
use crate::error::{DeferError, DeferResult};
use crate::schedule::FALLBACK_FRAME_INTERVAL;

/// Counter and fallback-timer settings.
///
/// Loadable from TOML; every field is optional:
///
/// ```toml
/// max_count = 60
/// frame_interval_ms = 33.3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferConfig {
    /// Ceiling for counters built from this config.
    #[serde(default = "default_max_count")]
    pub max_count: u32,

    /// Fallback timer interval in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f64,
}

fn default_max_count() -> u32 {
    DEFAULT_MAX_COUNT
}

fn default_frame_interval_ms() -> f64 {
    FALLBACK_FRAME_INTERVAL.as_secs_f64() * 1000.0
}

impl Default for DeferConfig {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl DeferConfig {
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_frame_interval_ms(mut self, ms: f64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Fallback timer interval. Non-positive or non-finite values yield the
    /// 60 Hz default.
    pub fn frame_interval(&self) -> Duration {
        let ms = self.frame_interval_ms;
        if ms.is_finite() && ms > 0.0 {
            Duration::from_nanos((ms * 1_000_000.0).round() as u64)
        } else {
            FALLBACK_FRAME_INTERVAL
        }
    }

    pub fn from_toml_str(src: &str) -> DeferResult<Self> {
        toml::from_str(src).map_err(|e| DeferError::Config {
            origin: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads `path`, or returns defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> DeferResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).map_err(|e| DeferError::Config {
                origin: path.display().to_string(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
