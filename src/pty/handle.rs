//! PTY Session Handle
//!
//! Owns the master side of the pseudoterminal and the child spawned on it.
//! The master is shared behind a lock so a resize watcher can reach it while
//! another task blocks in [`PtySession::wait`].

use portable_pty::{Child, ChildKiller, MasterPty, PtySize};
use std::io::{Read, Write};
use std::sync::{Arc, Mutex};

use super::process::{spawn_pty_process, SpawnConfig};
use crate::error::{Error, Result};
use crate::models::{ChildExit, PtyProcess};

type SharedMaster = Arc<Mutex<Box<dyn MasterPty + Send>>>;

/// A running child attached to a PTY
///
/// Dropping the session closes the master side. Readers and writers taken
/// from it hold their own descriptors and stay usable until dropped.
pub struct PtySession {
    master: SharedMaster,
    child: Box<dyn Child + Send + Sync>,
    process: PtyProcess,
}

impl PtySession {
    /// Allocate a PTY and spawn the configured command on it
    pub fn start(config: &SpawnConfig) -> Result<Self> {
        spawn_pty_process(config)
    }

    pub(crate) fn from_parts(
        master: SharedMaster,
        child: Box<dyn Child + Send + Sync>,
        process: PtyProcess,
    ) -> Self {
        Self {
            master,
            child,
            process,
        }
    }

    /// Child process ID, when the platform reports one
    pub fn pid(&self) -> Option<u32> {
        self.process.pid
    }

    pub fn process(&self) -> &PtyProcess {
        &self.process
    }

    /// Reader over the child's combined output
    pub fn take_reader(&self) -> Result<Box<dyn Read + Send>> {
        self.lock_master()?
            .try_clone_reader()
            .map_err(|e| Error::PtyReaderCloneFailed {
                reason: e.to_string(),
            })
    }

    /// Writer into the child's input; can only be taken once
    pub fn take_writer(&self) -> Result<Box<dyn Write + Send>> {
        self.lock_master()?
            .take_writer()
            .map_err(|e| Error::PtyWriterTakeFailed {
                reason: e.to_string(),
            })
    }

    /// Propagate a new terminal size to the child
    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.resizer().resize(rows, cols)
    }

    /// Cloneable resize handle for use from another task
    pub fn resizer(&self) -> PtyResizer {
        PtyResizer {
            master: Arc::clone(&self.master),
        }
    }

    /// Handle that can kill the child while another task waits on it
    pub fn killer(&self) -> Box<dyn ChildKiller + Send + Sync> {
        self.child.clone_killer()
    }

    /// Block until the child terminates
    pub fn wait(&mut self) -> Result<ChildExit> {
        let status = self.child.wait().map_err(|e| Error::ChildWaitFailed {
            command: self.process.command.clone(),
            reason: e.to_string(),
        })?;

        let exit = ChildExit::from(status);
        self.process.mark_finished(exit.clone());

        info!(
            command = %self.process.command,
            pid = ?self.process.pid,
            duration_ms = self
                .process
                .execution_duration()
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            "Child {}",
            exit
        );

        Ok(exit)
    }

    fn lock_master(&self) -> Result<std::sync::MutexGuard<'_, Box<dyn MasterPty + Send>>> {
        lock(&self.master)
    }
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession")
            .field("process", &self.process)
            .finish_non_exhaustive()
    }
}

/// Resize handle sharing the session's master
#[derive(Clone)]
pub struct PtyResizer {
    master: SharedMaster,
}

impl PtyResizer {
    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        lock(&self.master)?
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::PtyResizeFailed {
                rows,
                cols,
                reason: e.to_string(),
            })
    }

    /// Size currently set on the PTY
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = lock(&self.master)?
            .get_size()
            .map_err(|e| Error::PtyResizeFailed {
                rows: 0,
                cols: 0,
                reason: format!("size query failed: {}", e),
            })?;
        Ok((size.rows, size.cols))
    }
}

fn lock(master: &SharedMaster) -> Result<std::sync::MutexGuard<'_, Box<dyn MasterPty + Send>>> {
    master.lock().map_err(|_| Error::PtyMasterPoisoned)
}
