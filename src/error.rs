//! Error types and Result aliases for ptyredact

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ptyredact operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ptyredact
///
/// Messages carry command names and OS reasons only. Redaction entries
/// never appear in an error.
#[derive(Debug, Error)]
pub enum Error {
    // === PTY-related errors ===
    /// Failed to allocate the PTY pair
    #[error("Failed to create PTY for command '{command}': {reason}")]
    PtyCreationFailed { command: String, reason: String },

    /// Failed to spawn command on the PTY slave
    #[error("Failed to spawn command '{command}': {reason}")]
    CommandSpawnFailed { command: String, reason: String },

    /// Failed to clone PTY reader
    #[error("Failed to clone PTY reader: {reason}")]
    PtyReaderCloneFailed { reason: String },

    /// Failed to take PTY writer
    #[error("Failed to take PTY writer: {reason}")]
    PtyWriterTakeFailed { reason: String },

    /// Failed to propagate a window size to the PTY
    #[error("Failed to resize PTY to {rows}x{cols}: {reason}")]
    PtyResizeFailed { rows: u16, cols: u16, reason: String },

    /// A task panicked while holding the PTY master
    #[error("PTY master lock poisoned")]
    PtyMasterPoisoned,

    /// Waiting on the child failed
    #[error("Failed to wait for command '{command}': {reason}")]
    ChildWaitFailed { command: String, reason: String },

    /// A background task panicked or was cancelled
    #[error("{task} task failed: {reason}")]
    TaskFailed { task: String, reason: String },

    /// Failed to install a signal listener
    #[error("Failed to listen for {signal}: {reason}")]
    SignalListenFailed { signal: String, reason: String },

    // === Terminal errors ===
    /// Raw mode could not be entered or restored
    #[error("Terminal mode change failed: {reason}")]
    TerminalModeFailed { reason: String },

    /// Writing redacted output downstream failed
    #[error("Failed to forward output: {0}")]
    OutputFailed(#[source] std::io::Error),

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// No command was given to run
    #[error("Command cannot be empty")]
    EmptyCommand,

    // === I/O errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error happened before a child could be spawned
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Error::PtyCreationFailed { .. }
                | Error::CommandSpawnFailed { .. }
                | Error::PtyReaderCloneFailed { .. }
                | Error::PtyWriterTakeFailed { .. }
                | Error::ConfigLoadFailed { .. }
                | Error::ConfigValidationFailed { .. }
                | Error::EmptyCommand
        )
    }
}
