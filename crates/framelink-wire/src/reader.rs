use std::io::Read;

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{Packet, HEADER_SIZE, LEN_PREFIX_SIZE, MAX_FRAME_SIZE, TAG_SIZE};
use crate::error::{Result, WireError};
use crate::io::{drain_exact, read_exact};

/// Outcome of receiving one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// The whole frame fit the receive budget.
    Complete(Packet),
    /// The frame declared more than the receive budget. The packet holds
    /// the leading payload bytes; the rest was read off the stream and
    /// thrown away so the next frame starts aligned.
    Truncated {
        packet: Packet,
        /// Payload bytes discarded.
        discarded: usize,
    },
}

impl Received {
    /// The received packet, whole or truncated.
    pub fn packet(&self) -> &Packet {
        match self {
            Received::Complete(packet) => packet,
            Received::Truncated { packet, .. } => packet,
        }
    }

    /// Consume the outcome, keeping the packet.
    pub fn into_packet(self) -> Packet {
        match self {
            Received::Complete(packet) => packet,
            Received::Truncated { packet, .. } => packet,
        }
    }

    /// Whether payload bytes were discarded.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Received::Truncated { .. })
    }
}

/// Reads complete packets from any `Read` stream.
///
/// Handles partial reads internally; callers get whole frames or a
/// terminal error, never a torn one.
pub struct PacketReader<T> {
    inner: T,
    max_frame: usize,
}

impl<T: Read> PacketReader<T> {
    /// Create a packet reader accepting frames up to the wire maximum.
    pub fn new(inner: T) -> Self {
        Self::with_max_frame(inner, MAX_FRAME_SIZE)
    }

    /// Create a packet reader with an explicit receive budget.
    ///
    /// `max_frame` counts every frame byte including the length prefix.
    /// Budgets below the minimum frame size are raised to it so the tag
    /// byte can always be read.
    pub fn with_max_frame(inner: T, max_frame: usize) -> Self {
        Self {
            inner,
            max_frame: max_frame.max(HEADER_SIZE),
        }
    }

    /// Receive the next packet (blocking).
    ///
    /// Returns `Err(WireError::ConnectionLost)` when the peer has closed.
    /// A frame declaring more than the receive budget comes back as
    /// [`Received::Truncated`] with the excess drained from the stream, so
    /// the following call starts on a frame boundary.
    pub fn recv(&mut self) -> Result<Received> {
        let mut prefix = [0u8; LEN_PREFIX_SIZE];
        read_exact(&mut self.inner, &mut prefix)?;

        let declared = u16::from_le_bytes(prefix) as usize;
        if declared == 0 {
            // A frame always carries at least its tag; a zero length only
            // appears on dead or desynchronized streams.
            debug!("zero-length frame, treating connection as lost");
            return Err(WireError::ConnectionLost);
        }

        let budget = self.max_frame - LEN_PREFIX_SIZE;
        let readable = declared.min(budget);

        let mut body = BytesMut::zeroed(readable);
        read_exact(&mut self.inner, &mut body)?;

        let tag = body[0];
        let payload = body.split_off(TAG_SIZE).freeze();
        let packet = Packet { tag, payload };

        if declared > budget {
            let discarded = declared - readable;
            drain_exact(&mut self.inner, discarded)?;
            debug!(declared, budget, discarded, "oversized frame truncated");
            return Ok(Received::Truncated { packet, discarded });
        }

        Ok(Received::Complete(packet))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the receive budget for subsequent packets.
    pub fn set_max_frame(&mut self, max_frame: usize) {
        self.max_frame = max_frame.max(HEADER_SIZE);
    }

    /// Current receive budget in frame bytes.
    pub fn max_frame(&self) -> usize {
        self.max_frame
    }
}
