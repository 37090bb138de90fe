//! Logging utilities.
//!
//! Everything in this crate logs through the `log` facade. Binaries call
//! [`init_logging`] once to install the `env_logger` backend; libraries
//! embedding the counters can install their own logger instead.

mod init;

pub use init::{init_logging, LoggingConfig};
