//! Shared utilities for boxwire: startup configuration, logging, error types.
//!
//! This crate provides common infrastructure used by the channel library and the CLI.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use config::RunMode;
pub use error::{Error, Result};

/// Initialize tracing with a specific default level.
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so that stdout stays
/// reserved for echoed replies.
pub fn init_tracing_with_default(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
