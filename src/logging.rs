//! Logging setup
//!
//! Logs go to stderr or to an append-only file. The child owns the terminal
//! during a session, so the default filter only lets warnings through.
//!
//! Never log redaction entries or child output; counts are fine.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Environment variable that overrides the configured filter
pub const LOG_ENV_VAR: &str = "PTYREDACT_LOG";

/// Build the filter: `PTYREDACT_LOG` wins over the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| Error::ConfigValidationFailed {
        field: "logging.level".to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let result = match &config.file {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if result.is_err() {
        debug!("Global subscriber already installed");
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: format!("cannot open log file: {}", e),
        })
}
