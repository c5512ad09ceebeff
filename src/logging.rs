//! Diagnostic logging to a file.
//!
//! The UI owns the terminal, so log records can only go to a file. The file
//! comes from `SANDBOX_LOG` or the `--log-file` config entry; with neither,
//! tracing macros stay no-ops.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "SANDBOX_LOG";

/// The log file to use: the environment wins over config.
pub fn log_path(configured: Option<&Path>) -> Option<PathBuf> {
    std::env::var_os(LOG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
}

/// Install the global subscriber writing to `path`, appending.
///
/// The filter defaults to `info` and honours `RUST_LOG`.
///
/// # Errors
/// Returns an error if the file cannot be opened or a subscriber is
/// already installed.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!(err))?;
    tracing::debug!(log = %path.display(), "logging initialized");
    Ok(())
}
