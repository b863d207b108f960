//! Pseudoterminal (PTY) Management
//!
//! Spawning the child on a PTY, the blocking copy loops that bridge it to
//! the controlling terminal, and the signal listeners that keep it sized
//! and stoppable.

pub mod handle;
pub mod process;
pub mod signals;
pub mod streams;

// Re-exports for convenience
pub use handle::{PtyResizer, PtySession};
pub use process::{spawn_pty_process, SpawnConfig};
pub use signals::Signal;
pub use streams::{pump_input, pump_output};
