//! Core data models for ptyredact

pub mod pty_process;

// Re-exports for convenience
pub use pty_process::{ChildExit, PtyProcess, PtyState, FAILURE_EXIT_CODE};
