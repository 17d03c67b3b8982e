//! Length-prefixed packet framing for framelink.
//!
//! Every frame on the wire is:
//! - A 2-byte little-endian length counting the tag and payload
//! - A 1-byte application-defined tag
//! - The payload (length - 1 bytes)
//!
//! There is no magic number and no checksum; framing integrity rests
//! entirely on the exact-I/O discipline in [`io`]. A frame larger than the
//! receive budget is truncated to it and the excess drained off the
//! stream, so one oversized frame never shears the conversation out of
//! alignment.

pub mod codec;
pub mod error;
pub mod io;
pub mod reader;
pub mod writer;

pub use codec::{
    declared_len, declared_payload_len, encode_packet, error_name, error_status, frame_tag,
    magnitude, Packet, HEADER_SIZE, LEN_PREFIX_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD,
    MESSAGE_VALUE_SIZE, TAG_SIZE,
};
pub use error::{Result, WireError};
pub use io::{read_exact, write_exact};
pub use reader::{PacketReader, Received};
pub use writer::PacketWriter;
