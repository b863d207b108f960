//! PTY Signal Handling
//!
//! Listens for signals delivered to the wrapper itself: window-size changes
//! are pushed to the PTY, and termination requests are forwarded to the
//! child so the session can still shut down through its normal path.

use portable_pty::ChildKiller;
use tokio::signal::unix::{signal, Signal as UnixSignal, SignalKind};
use tokio::task::JoinHandle;

use super::handle::PtyResizer;
use crate::error::{Error, Result};
use crate::terminal;

/// Termination signals the wrapper forwards to its child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
    /// SIGHUP
    Hangup,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Hangup => "SIGHUP",
        }
    }

    fn kind(&self) -> SignalKind {
        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Hangup => SignalKind::hangup(),
        }
    }

    fn listen(&self) -> Result<UnixSignal> {
        signal(self.kind()).map_err(|e| Error::SignalListenFailed {
            signal: self.name().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Copy the controlling terminal's size onto the PTY
///
/// Returns the size in effect, or `None` when stdin is not a terminal. The
/// PTY is left alone when it already has that size, so the child sees no
/// SIGWINCH for a no-op change.
pub fn sync_window_size(resizer: &PtyResizer) -> Option<(u16, u16)> {
    let (rows, cols) = terminal::window_size()?;
    if resizer.size().ok() == Some((rows, cols)) {
        return Some((rows, cols));
    }
    match resizer.resize(rows, cols) {
        Ok(()) => {
            trace!(rows, cols, "Propagated window size");
            Some((rows, cols))
        }
        Err(e) => {
            debug!("Failed to propagate window size: {}", e);
            None
        }
    }
}

/// Push the current size now and again on every SIGWINCH
///
/// The listener is registered before the initial push so a resize that
/// lands in between is not lost.
pub fn spawn_resize_watcher(resizer: PtyResizer) -> Result<JoinHandle<()>> {
    let mut winch = signal(SignalKind::window_change()).map_err(|e| Error::SignalListenFailed {
        signal: "SIGWINCH".to_string(),
        reason: e.to_string(),
    })?;

    sync_window_size(&resizer);

    Ok(tokio::spawn(async move {
        while winch.recv().await.is_some() {
            sync_window_size(&resizer);
        }
    }))
}

/// Kill the child when the wrapper receives SIGINT, SIGTERM or SIGHUP
///
/// In raw mode the terminal no longer turns Ctrl+C into SIGINT, so these
/// only arrive from outside (e.g. `kill`, a closed terminal).
pub fn spawn_termination_forwarder(
    mut killer: Box<dyn ChildKiller + Send + Sync>,
) -> Result<JoinHandle<Option<Signal>>> {
    let mut interrupt = Signal::Interrupt.listen()?;
    let mut terminate = Signal::Terminate.listen()?;
    let mut hangup = Signal::Hangup.listen()?;

    Ok(tokio::spawn(async move {
        let received = tokio::select! {
            Some(()) = interrupt.recv() => Signal::Interrupt,
            Some(()) = terminate.recv() => Signal::Terminate,
            Some(()) = hangup.recv() => Signal::Hangup,
            else => return None,
        };

        warn!("Received {}, stopping child", received.name());
        if let Err(e) = killer.kill() {
            debug!("Failed to kill child after {}: {}", received.name(), e);
        }
        Some(received)
    }))
}
