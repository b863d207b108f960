//! Session Orchestration
//!
//! Wires one interactive session together:
//!
//! - stdin → PTY, unfiltered, on a detached thread
//! - PTY → [`RedactingWriter`] → output sink, on a blocking task
//! - SIGWINCH → PTY resize, and SIGINT/SIGTERM/SIGHUP → kill child
//! - raw mode on the controlling terminal for the whole session
//!
//! The session ends when the child exits and its output has drained. The
//! raw-mode guard, the PTY writer and the PTY master are dropped before
//! [`Session::run`] returns, on success and error alike.
//!
//! End of input does not close the PTY writer. portable-pty sends `\n` and
//! VEOF when its writer drops, which the child would read as a line nobody
//! typed, so the writer lives until the child has been reaped.

use std::io::{self, ErrorKind, Read, Stdout, Write};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::models::{ChildExit, FAILURE_EXIT_CODE};
use crate::pty::{signals, streams, PtySession, SpawnConfig};
use crate::redact::{RedactingWriter, RedactionSet};
use crate::terminal::{self, RawModeGuard};

/// Startup configuration for one session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secrets scrubbed from the child's output
    pub redactions: RedactionSet,
    /// Command, arguments and environment for the child
    pub spawn: SpawnConfig,
    /// Read chunk size for both I/O pumps
    pub read_buffer_size: usize,
    /// Copy our stdin into the PTY
    pub forward_input: bool,
    /// Switch stdin to raw mode when it is a terminal
    pub raw_mode: bool,
}

impl SessionConfig {
    /// Interactive defaults: forward stdin and use raw mode
    pub fn new(redactions: RedactionSet, spawn: SpawnConfig) -> Self {
        Self {
            redactions,
            spawn,
            read_buffer_size: streams::DEFAULT_READ_BUFFER_SIZE,
            forward_input: true,
            raw_mode: true,
        }
    }
}

type InputSlot = Arc<Mutex<Option<Box<dyn Write + Send>>>>;

/// One wrapped command run
pub struct Session<W: Write + Send + 'static = Stdout> {
    config: SessionConfig,
    output: W,
    /// Source forwarded to the child; stdin when unset
    input: Option<Box<dyn Read + Send>>,
}

impl Session<Stdout> {
    /// Session writing redacted output to stdout
    pub fn new(config: SessionConfig) -> Self {
        Self::with_output(config, std::io::stdout())
    }
}

impl<W: Write + Send + 'static> Session<W> {
    /// Session writing redacted output to `output`
    pub fn with_output(config: SessionConfig, output: W) -> Self {
        Self {
            config,
            output,
            input: None,
        }
    }

    /// Forward `input` to the child instead of stdin
    ///
    /// Only read when [`SessionConfig::forward_input`] is set.
    pub fn with_input(mut self, input: impl Read + Send + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Run the child to completion
    ///
    /// Returns how the child ended. Fails before spawning on PTY or spawn
    /// errors; fails after the child is reaped if the output sink broke.
    pub async fn run(self) -> Result<ChildExit> {
        let Session {
            config,
            output,
            input,
        } = self;
        let SessionConfig {
            redactions,
            mut spawn,
            read_buffer_size,
            forward_input,
            raw_mode,
        } = config;

        if let Some((rows, cols)) = terminal::window_size() {
            spawn = spawn.with_size(rows, cols);
        }

        let mut pty = PtySession::start(&spawn)?;
        info!(
            command = %spawn.command,
            pid = ?pty.pid(),
            redactions = redactions.len(),
            "Session started"
        );

        let mut reader = match pty.take_reader() {
            Ok(reader) => reader,
            Err(e) => return Err(abandon(&pty, e)),
        };
        let input_slot: Option<InputSlot> = if forward_input {
            match pty.take_writer() {
                Ok(writer) => Some(Arc::new(Mutex::new(Some(writer)))),
                Err(e) => return Err(abandon(&pty, e)),
            }
        } else {
            None
        };

        let resize_task = signals::spawn_resize_watcher(pty.resizer())
            .map_err(|e| warn!("Resize forwarding disabled: {}", e))
            .ok();
        let signal_task = signals::spawn_termination_forwarder(pty.killer())
            .map_err(|e| warn!("Signal forwarding disabled: {}", e))
            .ok();

        let raw_guard = if raw_mode { enter_raw_mode() } else { None };

        if let Some(slot) = &input_slot {
            let source = input.unwrap_or_else(|| Box::new(io::stdin()) as Box<dyn Read + Send>);
            spawn_input_pump(source, SlotWriter(Arc::clone(slot)), read_buffer_size);
        }

        let output_task = tokio::task::spawn_blocking(move || {
            let mut filter = RedactingWriter::new(output, redactions);
            let result = streams::pump_output(&mut reader, &mut filter, read_buffer_size);
            let stats = filter.stats();
            debug!(
                bytes_in = stats.bytes_in,
                bytes_out = stats.bytes_out,
                lines = stats.lines_emitted,
                redactions = stats.redactions,
                held_back = filter.pending_len(),
                "Output pump finished"
            );
            result
        });

        let mut killer = pty.killer();
        let wait_task = tokio::task::spawn_blocking(move || {
            let exit = pty.wait();
            (pty, exit)
        });

        let output_result = join("output", output_task).await;
        if let Ok(Err(e)) = &output_result {
            error!("Output forwarding failed, stopping child: {}", e);
            if let Err(kill_err) = killer.kill() {
                debug!("Failed to kill child: {}", kill_err);
            }
        }

        let waited = join("wait", wait_task).await;

        // Restore the terminal before anything else reaches it
        drop(raw_guard);
        if let Some(slot) = &input_slot {
            release_input(slot);
        }
        abort(resize_task);
        abort(signal_task);

        let exit = match waited {
            Ok((pty, exit)) => {
                drop(pty);
                exit?
            }
            Err(e) => return Err(e),
        };

        match output_result {
            Ok(Ok(_)) => Ok(exit),
            Ok(Err(e)) => Err(Error::OutputFailed(e)),
            Err(e) => Err(e),
        }
    }
}

/// Process exit status for a finished session
///
/// The child's own code on a normal exit; [`FAILURE_EXIT_CODE`] when the
/// child was killed by a signal or the session failed.
pub fn exit_status(result: &Result<ChildExit>) -> i32 {
    match result {
        Ok(exit) => exit.exit_code(),
        Err(_) => FAILURE_EXIT_CODE,
    }
}

fn enter_raw_mode() -> Option<RawModeGuard> {
    match RawModeGuard::for_stdin_if_tty() {
        Ok(guard) => guard,
        Err(e) => {
            warn!("Continuing without raw mode: {}", e);
            None
        }
    }
}

/// Kill a child whose session could not be completed
///
/// The child is reaped when this process exits.
fn abandon(pty: &PtySession, err: Error) -> Error {
    if let Err(kill_err) = pty.killer().kill() {
        debug!("Failed to kill abandoned child: {}", kill_err);
    }
    err
}

/// PTY writer shared between the input thread and the session
///
/// Writes fail with `BrokenPipe` once the session has released the writer.
struct SlotWriter(InputSlot);

impl SlotWriter {
    fn with<T>(
        &self,
        op: impl FnOnce(&mut Box<dyn Write + Send>) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut slot = self
            .0
            .lock()
            .map_err(|_| io::Error::other("PTY writer lock poisoned"))?;
        match slot.as_mut() {
            Some(writer) => op(writer),
            None => Err(io::Error::new(ErrorKind::BrokenPipe, "session finished")),
        }
    }
}

impl Write for SlotWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with(|writer| writer.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with(|writer| writer.flush())
    }
}

/// Drop the PTY writer once the child is gone
fn release_input(slot: &InputSlot) {
    let writer = match slot.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    drop(writer);
}

fn spawn_input_pump(
    mut source: Box<dyn Read + Send>,
    mut writer: SlotWriter,
    buffer_size: usize,
) {
    let spawned = std::thread::Builder::new()
        .name("ptyredact-input".to_string())
        .spawn(move || {
            match streams::pump_input(&mut source, &mut writer, buffer_size) {
                Ok(bytes) => debug!(bytes, "Input ended; PTY writer kept open"),
                Err(e) => debug!("Input forwarding stopped: {}", e),
            }
        });

    if let Err(e) = spawned {
        warn!("Failed to start input thread: {}", e);
    }
}

async fn join<T>(task: &str, handle: JoinHandle<T>) -> Result<T> {
    handle.await.map_err(|e| Error::TaskFailed {
        task: task.to_string(),
        reason: e.to_string(),
    })
}

fn abort<T>(task: Option<JoinHandle<T>>) {
    if let Some(task) = task {
        task.abort();
    }
}
