use bytes::{BufMut, Bytes, BytesMut};
use framelink_status::StatusCode;

use crate::error::{Result, WireError};

/// Length prefix: 2 bytes, little-endian.
pub const LEN_PREFIX_SIZE: usize = 2;

/// Tag discriminator: 1 byte.
pub const TAG_SIZE: usize = 1;

/// Smallest legal frame: length prefix + tag = 3 bytes.
pub const HEADER_SIZE: usize = LEN_PREFIX_SIZE + TAG_SIZE;

/// Largest payload a length prefix can describe (65535 minus the tag).
pub const MAX_PAYLOAD: usize = u16::MAX as usize - TAG_SIZE;

/// Largest complete frame on the wire: prefix + tag + maximum payload.
pub const MAX_FRAME_SIZE: usize = LEN_PREFIX_SIZE + u16::MAX as usize;

/// Size of the value carried by a message packet's payload.
pub const MESSAGE_VALUE_SIZE: usize = 2;

/// A framed packet: one tag byte plus an opaque payload.
///
/// The tag is an application-defined discriminator; the codec attaches no
/// meaning to it. Packets are transient: built just before sending and
/// dropped after handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Application-defined discriminator byte.
    pub tag: u8,
    /// The packet payload.
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet.
    pub fn new(tag: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// Create a message packet carrying a 16-bit magnitude.
    ///
    /// A zero magnitude encodes as a bare tag with no payload; anything
    /// else encodes as exactly two little-endian bytes. Callers migrating
    /// signed values convert through [`magnitude`] first.
    pub fn message(tag: u8, magnitude: u16) -> Self {
        let payload = if magnitude == 0 {
            Bytes::new()
        } else {
            Bytes::copy_from_slice(&magnitude.to_le_bytes())
        };
        Self { tag, payload }
    }

    /// The total wire size of this packet (prefix + tag + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Interpret the payload as a wire status code.
    ///
    /// Reads the first two payload bytes as a little-endian code and
    /// resolves it through the registry; payloads too short to carry one
    /// resolve to [`StatusCode::Unknown`]. Meaningful only for packets the
    /// application tags as errors.
    pub fn error_status(&self) -> StatusCode {
        payload_status(&self.payload)
    }
}

/// Encode a packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────┬─────────────────────┐
/// │ Length     │ Tag      │ Payload              │
/// │ (2B LE)    │ (1B)     │ (Length - 1 bytes)   │
/// └────────────┴──────────┴─────────────────────┘
/// ```
///
/// `Length` counts the tag and the payload, so it is always at least 1.
/// Fails with [`WireError::PayloadTooLarge`] beyond [`MAX_PAYLOAD`].
pub fn encode_packet(tag: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u16_le((payload.len() + TAG_SIZE) as u16);
    dst.put_u8(tag);
    dst.put_slice(payload);
    Ok(())
}

/// The wire magnitude of a signed value: absolute value, truncated to 16
/// bits.
///
/// The wire carries no sign, so `magnitude(-300)` and `magnitude(300)` are
/// both 300; values beyond 16 bits lose their high bits.
pub fn magnitude(value: i32) -> u16 {
    value.unsigned_abs() as u16
}

/// The length an encoded frame declares in its prefix, or `None` if the
/// slice is too short to hold a prefix.
pub fn declared_len(frame: &[u8]) -> Option<u16> {
    let prefix = frame.get(..LEN_PREFIX_SIZE)?;
    Some(u16::from_le_bytes([prefix[0], prefix[1]]))
}

/// The payload size an encoded frame declares: its length minus the tag.
///
/// `None` for slices too short to hold a prefix or frames declaring an
/// illegal zero length.
pub fn declared_payload_len(frame: &[u8]) -> Option<usize> {
    (declared_len(frame)? as usize).checked_sub(TAG_SIZE)
}

/// The tag byte of an encoded frame, or `None` if the slice has no tag.
pub fn frame_tag(frame: &[u8]) -> Option<u8> {
    frame.get(LEN_PREFIX_SIZE).copied()
}

/// The status code carried by an encoded error frame.
///
/// Reads the two payload bytes after the tag as a little-endian code;
/// frames too short to carry one resolve to [`StatusCode::Unknown`].
pub fn error_status(frame: &[u8]) -> StatusCode {
    match frame.get(HEADER_SIZE..) {
        Some(payload) => payload_status(payload),
        None => StatusCode::Unknown,
    }
}

/// The symbolic name for the status carried by an encoded error frame.
pub fn error_name(frame: &[u8]) -> &'static str {
    error_status(frame).name()
}

fn payload_status(payload: &[u8]) -> StatusCode {
    match payload.get(..MESSAGE_VALUE_SIZE) {
        Some(bytes) => StatusCode::from_wire(u16::from_le_bytes([bytes[0], bytes[1]])),
        None => StatusCode::Unknown,
    }
}
