//! Raw Mode Guard
//!
//! Puts the controlling terminal into raw mode for the life of a guard and
//! restores the previous mode when the guard is dropped, whether the
//! session ends normally, returns an error, or unwinds from a panic.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

use super::is_tty;
use crate::error::{Error, Result};

/// Raw mode held for as long as this value lives
#[must_use = "the terminal is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Switch stdin to raw mode if it is a terminal
    ///
    /// Returns `Ok(None)` when stdin is not a terminal, or when raw mode is
    /// already on and someone else owns restoring it. An error means stdin
    /// is a terminal but its mode could not be changed; the terminal is left
    /// as it was.
    pub fn for_stdin_if_tty() -> Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }

        if is_raw_mode_enabled().unwrap_or(false) {
            debug!("Terminal already in raw mode");
            return Ok(None);
        }

        enable_raw_mode().map_err(|e| Error::TerminalModeFailed {
            reason: format!("enable raw mode: {}", e),
        })?;

        debug!("Terminal switched to raw mode");
        Ok(Some(Self { _private: () }))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match disable_raw_mode() {
            Ok(()) => debug!("Terminal mode restored"),
            Err(e) => error!("Failed to restore terminal mode: {}", e),
        }
    }
}
