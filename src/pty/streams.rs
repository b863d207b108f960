//! PTY Streams
//!
//! Blocking copy loops that bridge the controlling terminal and the PTY
//! master. Each loop runs on its own thread and owns its two endpoints, so
//! the input and output directions never share state.

use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

/// Default read chunk size for both directions
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Pause before retrying a read that would block
const WOULD_BLOCK_BACKOFF: Duration = Duration::from_millis(10);

/// Copy the child's output into `writer` until the PTY closes
///
/// The writer is flushed after every chunk so redacted lines reach the
/// terminal without delay. EOF and `EIO` (what Linux returns on the master
/// once every slave descriptor is closed) both end the copy normally. A
/// failing `writer` ends it with that error.
pub fn pump_output<R, W>(reader: &mut R, writer: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        match reader.read(&mut buf) {
            Ok(0) => {
                debug!("PTY read EOF - process terminated");
                break;
            }
            Ok(n) => {
                writer.write_all(&buf[..n])?;
                writer.flush()?;
                total += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                debug!("PTY read interrupted (EINTR), retrying...");
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(WOULD_BLOCK_BACKOFF);
            }
            Err(e) if is_pty_closed(&e) => {
                debug!("PTY read EIO - slave side closed");
                break;
            }
            Err(e) => {
                warn!("PTY read error ({}): {}", e.kind(), e);
                return Err(e);
            }
        }
    }

    debug!(bytes = total, "PTY output pump exiting");
    Ok(total)
}

/// Copy the user's input into the PTY, unfiltered, until input ends
///
/// Bytes are forwarded as they arrive; nothing is buffered beyond a single
/// read.
pub fn pump_input<R, W>(reader: &mut R, writer: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = writer.write_all(&buf[..n]).and_then(|_| writer.flush()) {
                    debug!("PTY write error ({}): {}", e.kind(), e);
                    return Err(e);
                }
                total += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Input read error ({}): {}", e.kind(), e);
                return Err(e);
            }
        }
    }

    debug!(bytes = total, "PTY input pump exiting");
    Ok(total)
}

fn is_pty_closed(err: &io::Error) -> bool {
    err.raw_os_error() == Some(nix::libc::EIO)
}
