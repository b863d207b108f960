//! PTY Process Model
//!
//! Tracks the lifecycle of the child command running on the PTY slave and
//! the single exit value the session reports for it.

use chrono::{DateTime, Utc};
use std::fmt;

/// Exit status reported when the child did not exit normally, or when no
/// child could be run at all
pub const FAILURE_EXIT_CODE: i32 = 1;

/// How the child process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildExit {
    /// Exited normally with this code
    Exited(i32),
    /// Terminated by the named signal
    Signaled(String),
}

impl ChildExit {
    /// Status to report as our own
    ///
    /// Signal terminations map to [`FAILURE_EXIT_CODE`]; the signal number is
    /// never passed through.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildExit::Exited(code) => *code,
            ChildExit::Signaled(_) => FAILURE_EXIT_CODE,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ChildExit::Exited(0))
    }
}

impl From<portable_pty::ExitStatus> for ChildExit {
    fn from(status: portable_pty::ExitStatus) -> Self {
        match status.signal() {
            Some(signal) => ChildExit::Signaled(signal.to_string()),
            None => ChildExit::Exited(i32::try_from(status.exit_code()).unwrap_or(FAILURE_EXIT_CODE)),
        }
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Exited(code) => write!(f, "exited with code {}", code),
            ChildExit::Signaled(signal) => write!(f, "killed by {}", signal),
        }
    }
}

/// Lifecycle state of the child process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PtyState {
    /// Configured but not yet spawned
    #[default]
    Created,
    /// Spawned and running
    Running,
    /// Finished
    Finished(ChildExit),
}

/// Bookkeeping for the child command
#[derive(Debug, Clone)]
pub struct PtyProcess {
    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: PtyState,

    /// When the process was started
    pub start_time: Option<DateTime<Utc>>,

    /// When the process finished
    pub end_time: Option<DateTime<Utc>>,

    /// Command that was executed
    pub command: String,

    /// Arguments passed to the command
    pub args: Vec<String>,
}

impl PtyProcess {
    /// Create a new PTY process in the Created state
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self {
            pid: None,
            state: PtyState::Created,
            start_time: None,
            end_time: None,
            command,
            args,
        }
    }

    /// Mark the process as started with the given PID
    pub fn mark_started(&mut self, pid: Option<u32>) {
        self.pid = pid;
        self.state = PtyState::Running;
        self.start_time = Some(Utc::now());
    }

    /// Record how the process ended
    pub fn mark_finished(&mut self, exit: ChildExit) {
        self.state = PtyState::Finished(exit);
        self.end_time = Some(Utc::now());
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PtyState::Running)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, PtyState::Finished(_))
    }

    /// The recorded exit, once the process has finished
    pub fn exit(&self) -> Option<&ChildExit> {
        match &self.state {
            PtyState::Finished(exit) => Some(exit),
            _ => None,
        }
    }

    /// Wall time between start and finish
    pub fn execution_duration(&self) -> Option<std::time::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some(end.signed_duration_since(start).to_std().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl fmt::Display for PtyProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pid = self.pid.map_or("N/A".to_string(), |pid| pid.to_string());
        let state = match &self.state {
            PtyState::Created => "created".to_string(),
            PtyState::Running => "running".to_string(),
            PtyState::Finished(exit) => exit.to_string(),
        };
        write!(f, "{} [{}] {}", self.command, pid, state)
    }
}
