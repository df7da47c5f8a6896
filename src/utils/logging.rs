//! Diagnostic logging setup.
//!
//! The chat interface owns the terminal, so diagnostics only go to a file
//! (`--log <file>`). Verbosity follows `RUST_LOG` and defaults to `info`.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Route `tracing` output to `log_file`, appending. Without a file nothing is
/// installed and events are discarded.
pub fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| format!("Failed to initialise logging to {}: {err}", path.display()))?;
    Ok(())
}
