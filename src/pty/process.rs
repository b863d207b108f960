//! PTY Process Spawning
//!
//! Allocates a pseudoterminal pair and spawns the child command on its
//! slave side using the portable-pty crate.

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::handle::PtySession;
use crate::error::{Error, Result};
use crate::models::PtyProcess;

/// Default terminal height used when the real size is unknown
pub const DEFAULT_ROWS: u16 = 24;
/// Default terminal width used when the real size is unknown
pub const DEFAULT_COLS: u16 = 80;

/// Everything needed to start the child on a PTY
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Program to run, resolved against `PATH` in `env`
    pub command: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Complete environment for the child
    pub env: Vec<(OsString, OsString)>,
    /// Working directory for the child
    pub working_directory: Option<PathBuf>,
    /// Initial terminal size
    pub size: PtySize,
}

impl SpawnConfig {
    /// Config that inherits this process's environment and working directory
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: std::env::vars_os().collect(),
            working_directory: std::env::current_dir().ok(),
            size: PtySize {
                rows: DEFAULT_ROWS,
                cols: DEFAULT_COLS,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }

    /// Override the initial terminal size
    pub fn with_size(mut self, rows: u16, cols: u16) -> Self {
        self.size.rows = rows;
        self.size.cols = cols;
        self
    }

    fn command_builder(&self) -> CommandBuilder {
        let mut cmd_builder = CommandBuilder::new(&self.command);
        cmd_builder.args(&self.args);

        // Pass the environment through exactly as given
        cmd_builder.env_clear();
        for (key, value) in &self.env {
            cmd_builder.env(key, value);
        }

        // portable-pty falls back to $HOME when no cwd is set
        if let Some(dir) = &self.working_directory {
            cmd_builder.cwd(dir);
        }

        cmd_builder
    }
}

/// Open a PTY pair and spawn `config.command` on it
///
/// On failure every handle created so far is dropped before returning.
pub fn spawn_pty_process(config: &SpawnConfig) -> Result<PtySession> {
    if config.command.is_empty() {
        return Err(Error::EmptyCommand);
    }

    let pty_system = native_pty_system();

    let pair = pty_system
        .openpty(config.size)
        .map_err(|e| Error::PtyCreationFailed {
            command: config.command.clone(),
            reason: e.to_string(),
        })?;

    let child = pair
        .slave
        .spawn_command(config.command_builder())
        .map_err(|e| Error::CommandSpawnFailed {
            command: config.command.clone(),
            reason: e.to_string(),
        })?;

    // Only the child may hold the slave open, otherwise the master never
    // sees EOF once the child exits
    drop(pair.slave);

    let mut process = PtyProcess::new(config.command.clone(), config.args.clone());
    process.mark_started(child.process_id());

    debug!(
        command = %config.command,
        pid = ?process.pid,
        rows = config.size.rows,
        cols = config.size.cols,
        "Spawned command on PTY"
    );

    Ok(PtySession::from_parts(
        Arc::new(Mutex::new(pair.master)),
        child,
        process,
    ))
}
