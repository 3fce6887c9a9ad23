//! File-backed tracing setup. stdout belongs to the terminal UI, so log
//! lines go to `skyflap.log` in the platform data directory.

use crate::config::data_dir;
use crate::error::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter directive, e.g. `SKYFLAP_LOG=debug`.
pub const LOG_ENV: &str = "SKYFLAP_LOG";
pub const LOG_FILE_NAME: &str = "skyflap.log";

/// Install the global subscriber. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let path = data_dir()?.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(path)
}
