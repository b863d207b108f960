//! Controlling Terminal
//!
//! Thin wrappers over the host terminal: tty detection, raw mode, and the
//! current window size.

pub mod raw_mode;

pub use raw_mode::RawModeGuard;

use std::io::IsTerminal;

/// Whether stdin is attached to a terminal
pub fn is_tty() -> bool {
    std::io::stdin().is_terminal()
}

/// Current size of the terminal on stdin as `(rows, cols)`
///
/// Returns `None` when stdin is not a terminal or reports a zero size.
pub fn window_size() -> Option<(u16, u16)> {
    if !is_tty() {
        return None;
    }

    let (cols, rows) = crossterm::terminal::size()
        .map_err(|e| trace!("Window size unavailable: {}", e))
        .ok()?;

    if rows == 0 || cols == 0 {
        return None;
    }
    Some((rows, cols))
}
