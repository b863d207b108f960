//! ptyredact - run a command on a PTY and scrub secrets from its output
//!
//! The child believes it is attached to an interactive terminal. Everything
//! it prints passes through a line-buffering filter that masks each
//! configured secret with `*` before the line reaches stdout.
//!
//! ## Module Organization
//!
//! - [`redact`] - Redaction set and the redacting stream filter
//! - [`pty`] - PTY spawning, session handle, I/O pumps, signal listeners
//! - [`terminal`] - Raw mode and window size of the controlling terminal
//! - [`session`] - Orchestrates one wrapped command run
//! - [`config`] - TOML configuration loading
//! - [`logging`] - Tracing subscriber setup
//! - [`models`] - Child process lifecycle and exit status
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptyredact::{RedactionSet, Session, SessionConfig, SpawnConfig};
//!
//! # async fn run() -> ptyredact::Result<()> {
//! let redactions = RedactionSet::parse("hunter2\ns3cr3t-token");
//! let spawn = SpawnConfig::new("sh", vec!["-c".into(), "echo hunter2".into()]);
//!
//! let exit = Session::new(SessionConfig::new(redactions, spawn)).run().await?;
//! std::process::exit(exit.exit_code());
//! # }
//! ```
//!
//! ## Limitations
//!
//! - Redaction works on whole lines. A secret split by a newline is not
//!   masked.
//! - A final line without a trailing newline is never printed.
//! - Matching is literal and case-sensitive.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pty;
pub mod redact;
pub mod session;
pub mod terminal;

// Re-exports for core functionality
pub use config::{Config, ConfigLoader};
pub use error::{Error, Result};
pub use models::{ChildExit, FAILURE_EXIT_CODE};
pub use pty::{PtySession, SpawnConfig};
pub use redact::{RedactingWriter, RedactionSet};
pub use session::{exit_status, Session, SessionConfig};

/// The current version of ptyredact from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
