//! Redacting Stream Filter
//!
//! [`RedactingWriter`] sits between the PTY reader and the real stdout.
//! Bytes are held until a newline completes a line; only whole lines are
//! redacted and forwarded, so a secret split across two PTY reads is never
//! released half-masked.
//!
//! A trailing line with no newline is never forwarded, not on `flush` and
//! not on drop.

use std::io::{self, Write};

use super::RedactionSet;

/// Counters for a single filter's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Bytes accepted from upstream
    pub bytes_in: u64,
    /// Bytes forwarded downstream
    pub bytes_out: u64,
    /// Completed lines forwarded downstream
    pub lines_emitted: u64,
    /// Secret occurrences masked
    pub redactions: u64,
}

/// Line-buffering writer that masks secrets before forwarding
#[derive(Debug)]
pub struct RedactingWriter<W: Write> {
    inner: W,
    redactions: RedactionSet,
    /// Bytes received but not yet terminated by a newline
    pending: Vec<u8>,
    stats: FilterStats,
}

impl<W: Write> RedactingWriter<W> {
    /// Wrap `inner`, scrubbing every entry of `redactions`
    pub fn new(inner: W, redactions: RedactionSet) -> Self {
        Self {
            inner,
            redactions,
            pending: Vec::new(),
            stats: FilterStats::default(),
        }
    }

    /// Bytes currently held back waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the downstream sink, discarding any unterminated line
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn emit_complete_lines(&mut self) -> io::Result<()> {
        while let Some(idx) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=idx).collect();
            let masked = self.redactions.redact_line(&mut line);

            self.inner.write_all(&line)?;

            self.stats.bytes_out += line.len() as u64;
            self.stats.lines_emitted += 1;
            self.stats.redactions += masked as u64;
        }
        Ok(())
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    /// Buffer `buf` and forward every line it completes
    ///
    /// On success the whole chunk counts as consumed. If the downstream sink
    /// fails, its error is returned at once; the chunk stays absorbed and
    /// lines after the failing one remain pending.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.stats.bytes_in += buf.len() as u64;

        self.emit_complete_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
