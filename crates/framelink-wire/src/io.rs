//! Exact-read and exact-write loops over blocking streams.
//!
//! Stream transports deliver data in arbitrary chunk sizes; the framing
//! above this module is only correct if every read and write completes in
//! full. A short read surfaced as success would desynchronize every frame
//! that follows, so these loops retry until done or definitively failed.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, WireError};

/// Scratch size used when discarding bytes beyond a receive budget.
const DRAIN_CHUNK_SIZE: usize = 512;

/// Fill `buf` completely from `stream`.
///
/// Short reads accumulate and `Interrupted` is retried. A zero-length read
/// means the peer closed the connection and fails with
/// [`WireError::ConnectionLost`]; any other error is terminal. On failure
/// the stream position is unspecified and the connection should be dropped.
pub fn read_exact<T: Read>(stream: &mut T, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => return Err(WireError::ConnectionLost),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(WireError::Io(err)),
        }
    }
    Ok(())
}

/// Write all of `buf` to `stream`.
///
/// Short writes continue from where they left off and `Interrupted` is
/// retried. A zero-length write means the peer is gone and fails with
/// [`WireError::ConnectionLost`]; any other error is terminal.
pub fn write_exact<T: Write>(stream: &mut T, buf: &[u8]) -> Result<()> {
    let mut written = 0usize;
    while written < buf.len() {
        match stream.write(&buf[written..]) {
            Ok(0) => return Err(WireError::ConnectionLost),
            Ok(n) => written += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(WireError::Io(err)),
        }
    }
    Ok(())
}

/// Discard exactly `count` bytes from `stream`.
///
/// Same accounting discipline as [`read_exact`], chunked through a fixed
/// scratch buffer: the stream stays frame-aligned even when the bytes being
/// thrown away arrive fragmented.
pub(crate) fn drain_exact<T: Read>(stream: &mut T, count: usize) -> Result<()> {
    let mut scratch = [0u8; DRAIN_CHUNK_SIZE];
    let mut remaining = count;
    while remaining > 0 {
        let want = remaining.min(DRAIN_CHUNK_SIZE);
        read_exact(stream, &mut scratch[..want])?;
        remaining -= want;
    }
    Ok(())
}
