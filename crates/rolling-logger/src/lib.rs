//! Rolling File Logger
//!
//! Installs a `tracing` subscriber that writes to stderr and to
//! `<dir>/<app>.log`. When the active file would grow past its size limit it
//! is rotated to `<app>.1.log`, pushing older files up by one; the oldest
//! file beyond the limit is deleted, so the directory holds a fixed ring of
//! files.

mod writer;

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub use writer::{RollingConfig, RollingWriter};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Install the global subscriber with default rotation settings.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<RollingWriter, LoggerError> {
    init_with(RollingConfig::new(log_dir, app_name))
}

/// Install the global subscriber with explicit rotation settings
pub fn init_with(config: RollingConfig) -> Result<RollingWriter, LoggerError> {
    let writer = RollingWriter::open(config)?;
    writer.write_banner();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer.clone()))
        .try_init()
        .map_err(|e| LoggerError::AlreadyInstalled(e.to_string()))?;

    Ok(writer)
}
