//! Configuration management for ptyredact
//!
//! Settings that shape the wrapper itself (logging, PTY defaults). The
//! secrets and the command to run always come from the command line, never
//! from a file.

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::pty::process::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::pty::streams::DEFAULT_READ_BUFFER_SIZE;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// PTY configuration
    pub pty: PtyConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `ptyredact=debug`
    pub level: String,

    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            // Anything chattier interleaves with the child's output
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// PTY configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtyConfig {
    /// Rows used when stdin is not a terminal
    pub default_rows: u16,

    /// Columns used when stdin is not a terminal
    pub default_cols: u16,

    /// Read chunk size for the I/O pumps in bytes
    pub read_buffer_size: usize,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            default_rows: DEFAULT_ROWS,
            default_cols: DEFAULT_COLS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Check every field, naming the first offending one
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "logging.level".to_string(),
                reason: "Log level cannot be empty".to_string(),
            });
        }

        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            return Err(Error::ConfigValidationFailed {
                field: "logging.level".to_string(),
                reason: e.to_string(),
            });
        }

        if self.pty.default_rows == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.default_rows".to_string(),
                reason: "Rows must be greater than 0".to_string(),
            });
        }

        if self.pty.default_cols == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.default_cols".to_string(),
                reason: "Columns must be greater than 0".to_string(),
            });
        }

        if self.pty.read_buffer_size == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.read_buffer_size".to_string(),
                reason: "Read buffer size must be greater than 0".to_string(),
            });
        }

        if self.pty.read_buffer_size > 16 * 1024 * 1024 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.read_buffer_size".to_string(),
                reason: "Read buffer size cannot exceed 16 MiB".to_string(),
            });
        }

        Ok(())
    }
}
